//! Error types surfaced at the system boundary.
//!
//! The merge engine itself has no error paths; everything here belongs to
//! the surrounding glue (configuration, specification loading, remote API).
//! Collaborators return these values up the call chain; only the binary
//! decides on process termination.

use thiserror::Error;

/// Top-level error for a synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid or incomplete configuration; reported before any work runs.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The API specification could not be fetched or parsed.
    #[error("Specification error: {0}")]
    SpecError(String),

    /// The hosted collection API rejected or failed a request.
    #[error("Remote API error ({status}): {message}")]
    RemoteError { status: u16, message: String },

    /// The hosted collection API denied access.
    #[error("Permission denied by remote API: {0}")]
    PermissionError(String),

    #[error("HTTP transport error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SyncError {
    /// Build the appropriate remote error for an HTTP status code.
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 401 || status == 403 {
            SyncError::PermissionError(message)
        } else {
            SyncError::RemoteError { status, message }
        }
    }

    /// User-visible hint shown alongside permission failures.
    pub fn permission_hint(&self) -> Option<&'static str> {
        match self {
            SyncError::PermissionError(_) => Some(
                "Check that the API key is valid and has edit access to the \
                 target workspace and collection.",
            ),
            _ => None,
        }
    }
}
