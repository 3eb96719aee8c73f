/// Events emitted by a swizzle registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use swizzle_registry::SwizzleEvent;
///
/// let event = SwizzleEvent::Remove { key: "first".into(), found: true };
/// assert_eq!(event.to_string(), "remove { key: first, found: true }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwizzleEvent {
    /// A callback was stored under `key`.
    Register {
        key: String,
        /// Whether an earlier callback for the same key was discarded.
        replaced: bool,
    },

    /// A callback removal was requested.
    Remove { key: String, found: bool },

    /// Every callback was cleared.
    RemoveAll { removed: usize },

    /// The single install attempt finished.
    Install { installed: bool },

    /// An intercepted call was fanned out.
    Dispatch {
        action: String,
        /// Number of observers in the snapshot.
        observers: usize,
    },

    /// An observer panicked and was skipped.
    ObserverPanicked { key: String, action: String },
}

impl std::fmt::Display for SwizzleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwizzleEvent::Register { key, replaced } => {
                write!(f, "register {{ key: {key}, replaced: {replaced} }}")
            }
            SwizzleEvent::Remove { key, found } => {
                write!(f, "remove {{ key: {key}, found: {found} }}")
            }
            SwizzleEvent::RemoveAll { removed } => {
                write!(f, "remove_all {{ removed: {removed} }}")
            }
            SwizzleEvent::Install { installed } => {
                write!(f, "install {{ installed: {installed} }}")
            }
            SwizzleEvent::Dispatch { action, observers } => {
                write!(f, "dispatch {{ action: {action}, observers: {observers} }}")
            }
            SwizzleEvent::ObserverPanicked { key, action } => {
                write!(f, "observer_panicked {{ key: {key}, action: {action} }}")
            }
        }
    }
}
