//! Shared error types across brownout crates.

use thiserror::Error;

/// Stable classification of startup/configuration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Invalid or unsupported configuration.
    Config,
    /// The policy could not be loaded; the process cannot serve decisions.
    Fatal,
    /// The embedded runtime is in the wrong lifecycle state.
    Lifecycle,
}

impl ErrorClass {
    /// String representation used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Config => "CONFIG",
            ErrorClass::Fatal => "FATAL",
            ErrorClass::Lifecycle => "LIFECYCLE",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BrownoutError>;

/// Unified startup error used by core and bridge.
#[derive(Debug, Error)]
pub enum BrownoutError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("could not load policy module `{0}`")]
    ModuleNotFound(String),
    #[error("policy module `{module}` has no entry point `{entry}`")]
    EntryPointMissing { module: String, entry: String },
    #[error("could not create policy instance from `{module}`: {reason}")]
    ConstructorFailed { module: String, reason: String },
    #[error("policy runtime already initialized")]
    AlreadyInitialized,
    #[error("policy runtime was finalized and cannot be reinitialized")]
    Finalized,
}

impl BrownoutError {
    /// Map an error to its stable class.
    pub fn class(&self) -> ErrorClass {
        match self {
            BrownoutError::Config(_) | BrownoutError::UnsupportedVersion => ErrorClass::Config,
            BrownoutError::ModuleNotFound(_)
            | BrownoutError::EntryPointMissing { .. }
            | BrownoutError::ConstructorFailed { .. } => ErrorClass::Fatal,
            BrownoutError::AlreadyInitialized | BrownoutError::Finalized => ErrorClass::Lifecycle,
        }
    }
}

/// Result of a single call into a policy.
pub type PolicyResult<T> = std::result::Result<T, PolicyError>;

/// Recoverable call-time failure. Logged and absorbed by the bridge.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PolicyError {
    /// The policy itself failed while handling the call.
    #[error("policy raised: {0}")]
    Raised(String),
    /// The policy answered with something that does not fit the contract.
    #[error("invalid reply: {0}")]
    InvalidReply(String),
    /// The policy passed a bad argument to the scheduler facade.
    #[error("bad argument: {0}")]
    BadArgument(String),
}
