//! Macros for declaring process-scoped swizzle registries.

/// Declares a complete swizzle registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Callback table, trace callback and hook state statics (hidden)
/// - The platform interceptor, built lazily from the given expression (hidden)
/// - An `Api` handle that implements `SwizzleApi`, plus a public `API` constant
/// - Free functions delegating to `API`
///
/// The interceptor argument is optional and defaults to
/// [`UnsupportedPlatform`](crate::UnsupportedPlatform). The event type and the
/// interceptor expression are resolved from inside the generated module, which
/// glob-imports its parent module; items declared inside a function body are not
/// visible there.
///
/// # Examples
///
/// ```rust
/// use swizzle_registry::{define_swizzle, Selector};
///
/// pub struct TouchEvent {
///     pub x: f32,
/// }
///
/// define_swizzle!(send_action, TouchEvent);
///
/// fn main() {
///     send_action::register("breadcrumbs", |action, event| {
///         println!("{action} at {}", event.x);
///     });
///
///     // Harnesses (and platform adapters) drive the dispatch entry point directly.
///     let event = TouchEvent { x: 1.0 };
///     let outcome = send_action::dispatch(&Selector::new("buttonTapped:"), &event);
///     assert_eq!(outcome.invoked, 1);
///
///     send_action::remove("breadcrumbs");
///     assert!(send_action::is_empty());
/// }
/// ```
///
/// # With a platform adapter
///
/// ```rust
/// use swizzle_registry::{define_swizzle, ManualInterceptor, Selector};
///
/// static PLATFORM: ManualInterceptor<u64> = ManualInterceptor::new();
///
/// define_swizzle!(send_action, u64, &PLATFORM);
///
/// fn main() {
///     send_action::register("first", |_, _| {});
///     send_action::register("second", |_, _| {});
///     assert_eq!(PLATFORM.install_count(), 1);
///
///     // The platform call runs the observers, then the original implementation.
///     let handled = PLATFORM.send_action(&Selector::new("tap"), &7, || true);
///     assert!(handled);
/// }
/// ```
#[macro_export]
macro_rules! define_swizzle {
    ($name:ident, $event:ty) => {
        $crate::define_swizzle!($name, $event, $crate::UnsupportedPlatform);
    };
    ($name:ident, $event:ty, $interceptor:expr) => {
        pub mod $name {
            #![allow(dead_code)]

            #[allow(unused_imports)]
            use super::*;

            use std::sync::{LazyLock, Mutex};

            // Registry statics (module-private)
            static CALLBACKS: $crate::CallbackTable<$event> = $crate::CallbackTable::new();

            static TRACE: $crate::TraceCallback = Mutex::new(None);

            static HOOK: $crate::HookState = $crate::HookState::new();

            static INTERCEPTOR: LazyLock<Box<dyn $crate::Interceptor<$event>>> =
                LazyLock::new(|| -> Box<dyn $crate::Interceptor<$event>> {
                    Box::new($interceptor)
                });

            /// Zero-sized handle that implements the registry API.
            ///
            /// All operations are provided by the `SwizzleApi` trait's default
            /// implementations. This struct only provides access to the statics.
            #[derive(Debug, Clone, Copy)]
            pub struct Api;

            impl $crate::SwizzleApi for Api {
                type Event = $event;

                fn trace() -> &'static $crate::TraceCallback {
                    &TRACE
                }

                fn hook() -> &'static $crate::HookState {
                    &HOOK
                }

                fn interceptor() -> &'static dyn $crate::Interceptor<$event> {
                    &**INTERCEPTOR
                }

                fn callbacks() -> &'static $crate::CallbackTable<$event> {
                    &CALLBACKS
                }
            }

            /// Constant handle for trait-based access.
            pub const API: Api = Api;

            /// Register an observer under `key`, replacing any previous one.
            pub fn register(
                key: &str,
                callback: impl Fn(&str, &$event) + Send + Sync + 'static,
            ) {
                use $crate::SwizzleApi;
                API.register(key, callback)
            }

            /// Remove the observer registered under `key`, if any.
            pub fn remove(key: &str) {
                use $crate::SwizzleApi;
                API.remove(key)
            }

            /// Remove every observer. The platform hook stays installed.
            pub fn remove_all() {
                use $crate::SwizzleApi;
                API.remove_all()
            }

            pub fn contains(key: &str) -> bool {
                use $crate::SwizzleApi;
                API.contains(key)
            }

            pub fn len() -> usize {
                use $crate::SwizzleApi;
                API.len()
            }

            pub fn is_empty() -> bool {
                use $crate::SwizzleApi;
                API.is_empty()
            }

            /// Point-in-time copy of the registered observers.
            pub fn snapshot() -> $crate::Snapshot<$event> {
                use $crate::SwizzleApi;
                API.snapshot()
            }

            /// Dispatch entry point: fan an intercepted call out to every observer.
            pub fn dispatch(action: &$crate::Selector, event: &$event) -> $crate::DispatchOutcome {
                use $crate::SwizzleApi;
                API.dispatch(action, event)
            }

            /// Install the platform hook if that has not happened yet.
            pub fn install_once() -> &'static $crate::HookStatus {
                use $crate::SwizzleApi;
                API.install_once()
            }

            pub fn hook_status() -> Option<&'static $crate::HookStatus> {
                use $crate::SwizzleApi;
                API.hook_status()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::SwizzleEvent) + Send + Sync + 'static,
            ) {
                use $crate::SwizzleApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::SwizzleApi;
                API.clear_trace_callback()
            }
        }
    };
}
