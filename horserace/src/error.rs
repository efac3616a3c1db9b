use thiserror::Error;

/// Errors raised by the race store and the round simulator. Both kinds are programming errors in
/// the caller or in the configuration, nothing here is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The configuration cannot produce a valid program, e.g. too few unique horse names.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    /// An operation was called in a state that does not allow it.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),
}
