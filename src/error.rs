//! Error types for sample execution.

use thiserror::Error;

/// Result type alias using [`SampleError`].
pub type Result<T> = std::result::Result<T, SampleError>;

/// Errors that can occur while running the key vault samples.
///
/// All errors implement `std::error::Error` and can be chained with `source()`.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The resource endpoint could not be reached.
    ///
    /// This is the transient class raised while probing a freshly created
    /// vault whose DNS entry has not propagated yet. The readiness poller
    /// retries exactly this variant and nothing else.
    #[error("vault connection not available: {0}")]
    Connection(String),

    /// Token acquisition or credential validation failed.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A resource name does not satisfy the service's naming rules.
    #[error("invalid resource name: {0}")]
    InvalidName(String),

    /// The requested secret does not exist in the vault.
    #[error("secret not found: {0}")]
    SecretNotFound(String),

    /// The requested vault does not exist.
    #[error("vault not found: {0}")]
    VaultNotFound(String),

    /// The target resource group does not exist.
    #[error("resource group not found: {0}")]
    GroupNotFound(String),

    /// A provider was asked to run a sample it does not expose.
    #[error("unknown sample: {0}")]
    UnknownSample(String),

    /// The readiness poller was configured so that zero probe attempts
    /// would ever execute. Raised up front instead of failing later with
    /// no recorded error.
    #[error("readiness poll configured with no attempts (max_retries = {0})")]
    NoPollAttempts(u32),

    /// The cloud service rejected a request.
    #[error("service error: {0}")]
    Service(String),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SampleError {
    /// Returns true for the transient connectivity class that the
    /// readiness poller is allowed to retry.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
