use thiserror::Error;

/// Reasons the platform entry point could not be intercepted.
///
/// An install failure never surfaces from `register`: it is recorded once in the
/// registry's hook state and the subsystem degrades to a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// The current platform has no such entry point at all.
    #[error("interception of `{entry_point}` is not supported on this platform")]
    Unsupported { entry_point: String },

    /// The entry point is expected on this platform but could not be resolved.
    #[error("entry point `{entry_point}` was not found")]
    EntryPointNotFound { entry_point: String },

    /// The entry point has already been redirected by this adapter.
    #[error("entry point `{entry_point}` is already intercepted")]
    AlreadyInstalled { entry_point: String },

    /// The platform adapter reported another failure.
    #[error("platform interception failed: {0}")]
    Platform(String),
}
