//! Core trait defining swizzle registry behavior.
//!
//! This module provides the `SwizzleApi` trait with default implementations for
//! keyed observer registration, install-once interception, fan-out dispatch, and
//! tracing.
//!
//! The registry is key-based: each key can have exactly one observer callback stored.
//! Registering under the same key replaces the previous callback.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use crate::callback_table::{CallbackTable, Snapshot};
use crate::interceptor::{DispatchHook, HookState, HookStatus, Interceptor};
use crate::{InstallError, Selector, SwizzleEvent};

/// Type alias for the trace callback storage.
pub type TraceCallback = Mutex<Option<Arc<dyn Fn(&SwizzleEvent) + Send + Sync>>>;

/// Result of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Observers that were called.
    pub invoked: usize,
    /// Observers among `invoked` that panicked.
    pub panicked: usize,
}

/// Core trait defining swizzle registry behavior.
///
/// Provides default implementations for all operations, requiring only the accessor
/// methods for the registry's process-scoped statics (`callbacks`, `trace`, `hook`,
/// `interceptor`) to be implemented.
///
/// The implementor is a zero-sized handle; it is copied into the installed dispatch
/// hook, hence the `Copy + Send + Sync + 'static` bound.
pub trait SwizzleApi: Copy + Send + Sync + 'static {
    /// Opaque platform event passed through to observers by reference.
    type Event: ?Sized + 'static;

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback static.
    fn trace() -> &'static TraceCallback;

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked for every register, remove, install and dispatch.
    /// It runs without any registry lock held, so it may call back into the registry.
    fn set_trace_callback(&self, callback: impl Fn(&SwizzleEvent) + Send + Sync + 'static) {
        let mut guard = Self::trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Note: This does not affect registered observers, only the tracing callback.
    fn clear_trace_callback(&self) {
        let mut guard = Self::trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Emit a registry event to the current trace callback.
    ///
    /// A panicking trace callback is logged and swallowed, since events are also
    /// emitted from the platform's dispatch path.
    fn emit_event(&self, event: &SwizzleEvent) {
        let callback = Self::trace()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();

        if let Some(callback) = callback {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
                tracing::warn!(
                    %event,
                    panic = panic_message(&*payload),
                    "trace callback panicked"
                );
            }
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Interception
    // -------------------------------------------------------------------------------------------------

    /// Access the install-once hook state static.
    fn hook() -> &'static HookState;

    /// Access the platform adapter.
    fn interceptor() -> &'static dyn Interceptor<Self::Event>;

    /// Install the dispatch hook into the platform entry point, once.
    ///
    /// The first call hands [`SwizzleApi::dispatch`] to the interceptor; every later
    /// call (from any thread) returns the recorded outcome without touching the
    /// platform. A failed install is logged, never raised: observers stay registered
    /// but only fire through direct `dispatch` calls. An adapter that panics while
    /// installing is recorded as [`InstallError::Platform`].
    ///
    /// The interceptor must not call back into `install_once` while installing.
    fn install_once(&self) -> &'static HookStatus {
        let api = *self;
        let interceptor = Self::interceptor();

        let (status, ran) = Self::hook().get_or_install(|| {
            let hook: DispatchHook<Self::Event> =
                Arc::new(move |action: &Selector, event: &Self::Event| {
                    api.dispatch(action, event);
                });
            panic::catch_unwind(AssertUnwindSafe(|| interceptor.install(hook))).unwrap_or_else(
                |payload| {
                    Err(InstallError::Platform(format!(
                        "install panicked: {}",
                        panic_message(&*payload)
                    )))
                },
            )
        });

        if ran {
            match status {
                HookStatus::Installed => {
                    tracing::debug!(
                        entry_point = interceptor.entry_point(),
                        "interception installed"
                    );
                }
                HookStatus::Unavailable(err) => {
                    tracing::warn!(
                        entry_point = interceptor.entry_point(),
                        error = %err,
                        "interception unavailable, observers will not fire from the platform"
                    );
                }
            }
            self.emit_event(&SwizzleEvent::Install {
                installed: status.is_installed(),
            });
        }

        status
    }

    /// The install outcome, or `None` if nothing has triggered installation yet.
    fn hook_status(&self) -> Option<&'static HookStatus> {
        Self::hook().status()
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Access the callback table static.
    fn callbacks() -> &'static CallbackTable<Self::Event>;

    /// Register an observer under `key`.
    ///
    /// Replaces any callback already stored under `key`; dispatches starting after
    /// this returns only see the new one. The first registration installs the
    /// platform hook. Never fails.
    fn register(
        &self,
        key: &str,
        callback: impl Fn(&str, &Self::Event) + Send + Sync + 'static,
    ) {
        self.install_once();

        let replaced = Self::callbacks().insert(key, Arc::new(callback));
        tracing::debug!(key, replaced, "observer registered");

        self.emit_event(&SwizzleEvent::Register {
            key: key.to_string(),
            replaced,
        });
    }

    /// Remove the observer under `key`. Absent keys are a no-op.
    fn remove(&self, key: &str) {
        let found = Self::callbacks().remove(key);
        tracing::debug!(key, found, "observer removed");

        self.emit_event(&SwizzleEvent::Remove {
            key: key.to_string(),
            found,
        });
    }

    /// Remove every observer.
    ///
    /// The platform hook stays installed; only the observers are cleared.
    fn remove_all(&self) {
        let removed = Self::callbacks().clear();
        tracing::debug!(removed, "all observers removed");

        self.emit_event(&SwizzleEvent::RemoveAll { removed });
    }

    /// Check whether an observer is registered under `key`.
    fn contains(&self, key: &str) -> bool {
        Self::callbacks().contains(key)
    }

    /// Number of registered observers.
    fn len(&self) -> usize {
        Self::callbacks().len()
    }

    fn is_empty(&self) -> bool {
        Self::callbacks().is_empty()
    }

    /// Point-in-time copy of the registered observers.
    fn snapshot(&self) -> Snapshot<Self::Event> {
        Self::callbacks().snapshot()
    }

    // -------------------------------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------------------------------

    /// Dispatch entry point: fan one intercepted call out to every observer.
    ///
    /// Observers run synchronously in registration order, outside the table lock,
    /// each receiving the canonical action name and the same `event` reference. A
    /// panicking observer is logged and skipped; the rest still run and nothing
    /// propagates to the caller.
    ///
    /// The platform hook discards the returned outcome; harnesses may inspect it.
    fn dispatch(&self, action: &Selector, event: &Self::Event) -> DispatchOutcome {
        let snapshot = Self::callbacks().snapshot();
        let action = action.name();

        tracing::trace!(action, observers = snapshot.len(), "dispatching");
        self.emit_event(&SwizzleEvent::Dispatch {
            action: action.to_string(),
            observers: snapshot.len(),
        });

        let mut outcome = DispatchOutcome::default();
        for (key, callback) in snapshot.iter() {
            outcome.invoked += 1;

            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(action, event)))
            {
                outcome.panicked += 1;
                tracing::warn!(
                    key,
                    action,
                    panic = panic_message(&*payload),
                    "observer panicked, continuing fan-out"
                );
                self.emit_event(&SwizzleEvent::ObserverPanicked {
                    key: key.to_string(),
                    action: action.to_string(),
                });
            }
        }

        outcome
    }
}

fn panic_message<'a>(payload: &'a (dyn Any + Send + 'static)) -> &'a str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{DispatchOutcome, SwizzleApi, TraceCallback};
    use crate::callback_table::CallbackTable;
    use crate::interceptor::{HookState, Interceptor, ManualInterceptor};
    use crate::Selector;

    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct UiEvent {
        touches: u32,
    }

    static CALLBACKS: CallbackTable<UiEvent> = CallbackTable::new();
    static TRACE: TraceCallback = Mutex::new(None);
    static HOOK: HookState = HookState::new();
    static PLATFORM: ManualInterceptor<UiEvent> = ManualInterceptor::new();

    #[derive(Clone, Copy)]
    struct Api;

    impl SwizzleApi for Api {
        type Event = UiEvent;

        fn trace() -> &'static TraceCallback {
            &TRACE
        }

        fn hook() -> &'static HookState {
            &HOOK
        }

        fn interceptor() -> &'static dyn Interceptor<UiEvent> {
            &PLATFORM
        }

        fn callbacks() -> &'static CallbackTable<UiEvent> {
            &CALLBACKS
        }
    }

    const API: Api = Api;

    fn some_method() -> Selector {
        Selector::new("someMethod")
    }

    fn counter(api: Api, key: &str) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        api.register(key, move |_, _| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[test]
    #[serial]
    fn test_register_installs_hook_once() {
        API.remove_all();

        counter(API, "first");
        counter(API, "second");
        counter(API, "first");

        assert_eq!(PLATFORM.install_count(), 1);
        assert!(API.hook_status().unwrap().is_installed());
    }

    #[test]
    #[serial]
    fn test_fan_out_passes_same_event_reference() {
        API.remove_all();

        let event = UiEvent { touches: 1 };
        let event_addr = &event as *const UiEvent as usize;
        let seen = Arc::new(Mutex::new(Vec::new()));

        for key in ["a", "b", "c"] {
            let seen = seen.clone();
            API.register(key, move |action, event| {
                assert_eq!(event.touches, 1);
                seen.lock().unwrap().push((
                    action.to_string(),
                    event as *const UiEvent as usize,
                ));
            });
        }

        let outcome = API.dispatch(&some_method(), &event);
        assert_eq!(
            outcome,
            DispatchOutcome {
                invoked: 3,
                panicked: 0
            }
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        for (action, addr) in seen.iter() {
            assert_eq!(action, "someMethod");
            assert_eq!(*addr, event_addr);
        }
    }

    #[test]
    #[serial]
    fn test_overwrite_same_key() {
        API.remove_all();

        let old = counter(API, "first");
        let new = counter(API, "first");

        API.dispatch(&some_method(), &UiEvent { touches: 1 });

        assert_eq!(old.load(Ordering::SeqCst), 0);
        assert_eq!(new.load(Ordering::SeqCst), 1);
        assert_eq!(API.len(), 1);
    }

    #[test]
    #[serial]
    fn test_remove_leaves_others() {
        API.remove_all();

        let first = counter(API, "first");
        let second = counter(API, "second");

        API.remove("first");
        API.remove("never-registered");
        API.dispatch(&some_method(), &UiEvent { touches: 1 });

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert!(!API.contains("first"));
        assert!(API.contains("second"));
    }

    #[test]
    #[serial]
    fn test_remove_all_keeps_hook_installed() {
        API.remove_all();

        let never = counter(API, "never");
        API.remove_all();

        let outcome = PLATFORM.send_action(&some_method(), &UiEvent { touches: 1 }, || {
            API.dispatch(&some_method(), &UiEvent { touches: 2 })
        });

        assert_eq!(outcome.invoked, 0);
        assert_eq!(never.load(Ordering::SeqCst), 0);
        assert!(API.is_empty());
        assert!(PLATFORM.is_installed());
        assert!(API.hook_status().unwrap().is_installed());
    }

    #[test]
    #[serial]
    fn test_platform_call_reaches_observers() {
        API.remove_all();

        let hits = counter(API, "platform");
        let handled = PLATFORM.send_action(&some_method(), &UiEvent { touches: 3 }, || true);

        assert!(handled);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_panicking_observer_is_isolated() {
        API.remove_all();

        API.register("broken", |_, _| panic!("observer failure"));
        let after = counter(API, "after");

        let outcome = API.dispatch(&some_method(), &UiEvent { touches: 1 });

        assert_eq!(
            outcome,
            DispatchOutcome {
                invoked: 2,
                panicked: 1
            }
        );
        assert_eq!(after.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_observer_may_mutate_registry_during_dispatch() {
        API.remove_all();

        API.register("self-removing", |_, _| {
            API.remove("self-removing");
            API.register("late", |_, _| {});
        });

        let outcome = API.dispatch(&some_method(), &UiEvent { touches: 1 });
        assert_eq!(outcome.invoked, 1);
        assert!(!API.contains("self-removing"));
        assert!(API.contains("late"));
    }

    #[test]
    #[serial]
    fn test_trace_callback_sequence() {
        API.remove_all();
        API.install_once();

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        API.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.to_string());
        });

        API.register("first", |_, _| {});
        API.register("first", |_, _| {});
        API.dispatch(&some_method(), &UiEvent { touches: 1 });
        API.remove("first");
        API.remove_all();

        API.clear_trace_callback();

        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            [
                "register { key: first, replaced: false }",
                "register { key: first, replaced: true }",
                "dispatch { action: someMethod, observers: 1 }",
                "remove { key: first, found: true }",
                "remove_all { removed: 0 }",
            ]
        );
    }

    #[test]
    #[serial]
    fn test_panicking_trace_callback_does_not_break_dispatch() {
        API.remove_all();

        let hits = counter(API, "first");
        API.set_trace_callback(|_| panic!("trace failure"));

        let outcome = API.dispatch(&some_method(), &UiEvent { touches: 1 });
        API.clear_trace_callback();

        assert_eq!(outcome.invoked, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_snapshot_lists_keys_in_registration_order() {
        API.remove_all();

        API.register("z", |_, _| {});
        API.register("m", |_, _| {});
        API.register("a", |_, _| {});
        API.register("z", |_, _| {});

        let keys: Vec<String> = API.snapshot().keys().map(String::from).collect();
        assert_eq!(keys, ["z", "m", "a"]);
    }
}
