//! Configuration error types

/// Invalid list configuration.
///
/// Raised when a list is built or when an operation names something the
/// configuration does not know about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A list needs at least one column.
    #[error("list has no columns")]
    NoColumns,

    /// Two columns share the same id.
    #[error("duplicate column id \"{0}\"")]
    DuplicateColumn(String),

    /// A column id is not part of the configuration.
    #[error("unknown column \"{0}\"")]
    UnknownColumn(String),

    /// No filter spec exists for the given column.
    #[error("no filter configured for column \"{0}\"")]
    UnknownFilter(String),

    /// A row lacks a usable unique identifier.
    #[error("row has no unique identifier in field \"{0}\"")]
    MissingIdentifier(String),

    /// Rows per page must be positive.
    #[error("rows per page must be greater than zero")]
    InvalidRowsPerPage,
}
