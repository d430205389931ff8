//! Fetch error types

/// Errors reported by a [`Fetcher`](crate::loader::Fetcher).
///
/// These never travel through the data loader. Loader functions hand them to
/// their [`ErrorHandler`](crate::loader::ErrorHandler) and resolve with
/// fallback data instead.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The backing service reported a failure.
    #[error("Fetch failed: {message}")]
    Fetch {
        /// Description of the failure.
        message: String,
    },

    /// Reading the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload could not be decoded.
    #[error("Decode error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoadError {
    /// Creates a new fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }
}
