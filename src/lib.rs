//! # Swizzle Registry
//!
//! An install-once interception registry for capturing UI actions without the host
//! application's cooperation.
//!
//! A platform adapter redirects one dispatch entry point (by default the send-action
//! entry point) exactly once. Every intercepted call is then fanned out to any number
//! of observer callbacks, each registered under its own string key. Observers can be
//! added, replaced and removed at any time from any thread.
//!
//! ## Quick Start
//!
//! ```rust
//! use swizzle_registry::{define_swizzle, Selector};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! define_swizzle!(send_action, u32);
//!
//! static TAPS: AtomicUsize = AtomicUsize::new(0);
//!
//! fn main() {
//!     send_action::register("breadcrumbs", |action, _event| {
//!         assert_eq!(action, "buttonTapped:");
//!         TAPS.fetch_add(1, Ordering::SeqCst);
//!     });
//!
//!     send_action::dispatch(&Selector::new("buttonTapped:"), &0);
//!     assert_eq!(TAPS.load(Ordering::SeqCst), 1);
//! }
//! ```
//!
//! ## Features
//!
//! - **Install once**: the platform hook is attempted at most once per registry
//! - **Keyed observers**: last-write-wins per key, stable registration order
//! - **Lock-free fan-out**: observers run on a snapshot, outside the registry lock
//! - **Failure isolation**: a panicking observer never reaches the platform caller
//! - **Tracing support**: `tracing` spans and an optional in-process trace callback
//!
//! ## Main Items
//!
//! - [`define_swizzle!`] - Declare an isolated process-scoped registry
//! - [`SwizzleApi`] - The registry operations, for hand-written registries
//! - [`Interceptor`] - The platform adapter capability
//! - [`ManualInterceptor`] - In-process adapter for harnesses and embedders
//! - [`SwizzleEvent`] - Events passed to the trace callback

mod callback_table;
mod interceptor;
mod macros;
mod registry_error;
mod registry_event;
mod registry_trait;
mod selector;

pub use callback_table::{ActionCallback, CallbackTable, Snapshot};
pub use interceptor::{
    DispatchHook, HookState, HookStatus, Interceptor, ManualInterceptor, UnsupportedPlatform,
    SEND_ACTION,
};
pub use registry_error::InstallError;
pub use registry_event::SwizzleEvent;
pub use registry_trait::{DispatchOutcome, SwizzleApi, TraceCallback};
pub use selector::Selector;
