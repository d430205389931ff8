//! Error types

mod config;
mod delete;
mod load;

pub use config::*;
pub use delete::*;
pub use load::*;

/// Top-level error for list operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid list or column configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A fetch failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// One or more remove operations failed.
    #[error(transparent)]
    Delete(#[from] DeleteFailure),
}
