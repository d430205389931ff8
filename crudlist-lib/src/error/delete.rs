//! Delete error types

/// A single remove operation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to delete \"{id}\": {message}")]
pub struct DeleteError {
    /// Unique identifier of the row.
    pub id: String,
    /// Description of the failure.
    pub message: String,
}

impl DeleteError {
    /// Creates a new delete error.
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

/// One or more remove operations of a batch delete failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{} of {} deletions failed{}",
    .errors.len(),
    .errors.len() + .deleted,
    first_error(.errors)
)]
pub struct DeleteFailure {
    /// The individual failures, in selection order.
    pub errors: Vec<DeleteError>,
    /// Number of rows that were removed.
    pub deleted: usize,
}

impl DeleteFailure {
    /// Returns the identifiers that could not be removed.
    pub fn failed_ids(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.id.as_str())
    }
}

fn first_error(errors: &[DeleteError]) -> String {
    errors
        .first()
        .map(|first| format!(" ({first})"))
        .unwrap_or_default()
}
