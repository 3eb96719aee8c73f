//! The install-once interception capability and its process-scoped state.
//!
//! A platform adapter implements [`Interceptor`]: given a [`DispatchHook`] it redirects
//! one named entry point so every call reaches the hook before the original
//! implementation runs. The registry drives the adapter through a [`HookState`], which
//! guarantees `install` is attempted at most once per registry for the life of the
//! process. There is no uninstall.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::{InstallError, Selector};

/// Native name of the send-action entry point intercepted by default.
pub const SEND_ACTION: &str = "sendAction:to:from:forEvent:";

/// The registry's dispatch entry point as handed to the platform adapter.
pub type DispatchHook<E> = Arc<dyn Fn(&Selector, &E) + Send + Sync>;

/// Platform capability that redirects a single entry point to a [`DispatchHook`].
pub trait Interceptor<E: ?Sized>: Send + Sync {
    /// Native name of the redirected entry point, used in logs and errors.
    fn entry_point(&self) -> &str;

    /// Redirects the entry point so every call first invokes `hook`, then continues
    /// into the original implementation.
    fn install(&self, hook: DispatchHook<E>) -> Result<(), InstallError>;
}

impl<E: ?Sized, I: Interceptor<E> + ?Sized> Interceptor<E> for &'static I {
    fn entry_point(&self) -> &str {
        (**self).entry_point()
    }

    fn install(&self, hook: DispatchHook<E>) -> Result<(), InstallError> {
        (**self).install(hook)
    }
}

impl<E: ?Sized, I: Interceptor<E> + ?Sized> Interceptor<E> for Arc<I> {
    fn entry_point(&self) -> &str {
        (**self).entry_point()
    }

    fn install(&self, hook: DispatchHook<E>) -> Result<(), InstallError> {
        (**self).install(hook)
    }
}

/// Outcome of the single install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookStatus {
    /// The entry point is redirected to the registry.
    Installed,
    /// Interception is not available; callbacks are stored but never fire from the
    /// platform.
    Unavailable(InstallError),
}

impl HookStatus {
    pub fn is_installed(&self) -> bool {
        matches!(self, HookStatus::Installed)
    }
}

/// Process-scoped install-once guard.
///
/// Concurrent first-time triggers block until the single attempt completes; every
/// caller then observes the same [`HookStatus`].
#[derive(Debug, Default)]
pub struct HookState {
    status: OnceLock<HookStatus>,
}

impl HookState {
    pub const fn new() -> Self {
        HookState {
            status: OnceLock::new(),
        }
    }

    /// The recorded outcome, or `None` if nothing triggered installation yet.
    pub fn status(&self) -> Option<&HookStatus> {
        self.status.get()
    }

    /// Runs `install` unless an outcome is already recorded.
    ///
    /// Returns the recorded outcome and whether this call was the one that ran
    /// `install`. `install` must not re-enter the same `HookState`.
    pub fn get_or_install(
        &self,
        install: impl FnOnce() -> Result<(), InstallError>,
    ) -> (&HookStatus, bool) {
        let mut ran = false;
        let status = self.status.get_or_init(|| {
            ran = true;
            match install() {
                Ok(()) => HookStatus::Installed,
                Err(err) => HookStatus::Unavailable(err),
            }
        });
        (status, ran)
    }
}

/// Adapter for platforms that do not have the intercepted entry point.
///
/// Installation always reports [`InstallError::Unsupported`], which degrades the
/// registry to a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

impl<E: ?Sized> Interceptor<E> for UnsupportedPlatform {
    fn entry_point(&self) -> &str {
        SEND_ACTION
    }

    fn install(&self, _hook: DispatchHook<E>) -> Result<(), InstallError> {
        Err(InstallError::Unsupported {
            entry_point: SEND_ACTION.to_string(),
        })
    }
}

/// In-process adapter that plays the role of the platform.
///
/// It keeps the installed hook and lets a harness (or an embedding event loop) drive
/// intercepted calls through [`ManualInterceptor::send_action`]. Every `install` call
/// is counted, so a harness can verify the hook was installed exactly once.
///
/// ```rust
/// use std::sync::Arc;
/// use swizzle_registry::{Interceptor, ManualInterceptor, Selector};
///
/// let platform = ManualInterceptor::<u32>::new();
/// platform
///     .install(Arc::new(|action: &Selector, event: &u32| {
///         println!("{action} {event}");
///     }))
///     .unwrap();
///
/// let handled = platform.send_action(&Selector::new("tapped:"), &7, || true);
/// assert!(handled);
/// assert_eq!(platform.install_count(), 1);
/// ```
pub struct ManualInterceptor<E: ?Sized> {
    entry_point: &'static str,
    hook: OnceLock<DispatchHook<E>>,
    installs: AtomicUsize,
}

impl<E: ?Sized> ManualInterceptor<E> {
    /// Adapter for the default send-action entry point. Usable in `static` items.
    pub const fn new() -> Self {
        Self::for_entry_point(SEND_ACTION)
    }

    pub const fn for_entry_point(entry_point: &'static str) -> Self {
        ManualInterceptor {
            entry_point,
            hook: OnceLock::new(),
            installs: AtomicUsize::new(0),
        }
    }

    /// How many times `install` was called, successful or not.
    pub fn install_count(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    pub fn is_installed(&self) -> bool {
        self.hook.get().is_some()
    }

    /// Simulates one call of the intercepted entry point.
    ///
    /// The installed hook (if any) sees `action` and the very same `event` reference;
    /// then `original` runs and its result is returned unchanged.
    pub fn send_action<R>(&self, action: &Selector, event: &E, original: impl FnOnce() -> R) -> R {
        if let Some(hook) = self.hook.get() {
            hook(action, event);
        }
        original()
    }
}

impl<E: ?Sized> Default for ManualInterceptor<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> Interceptor<E> for ManualInterceptor<E> {
    fn entry_point(&self) -> &str {
        self.entry_point
    }

    fn install(&self, hook: DispatchHook<E>) -> Result<(), InstallError> {
        self.installs.fetch_add(1, Ordering::SeqCst);
        self.hook
            .set(hook)
            .map_err(|_| InstallError::AlreadyInstalled {
                entry_point: self.entry_point.to_string(),
            })
    }
}
