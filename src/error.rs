//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Post {0} not found")]
    NotFound(i32),

    #[error("Object store error: {0}")]
    Storage(String),

    #[error("CDN error: {0}")]
    Cdn(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures of a collaborating service (object store or CDN),
    /// as opposed to our own persistence or the caller's input.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::Cdn(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_id() {
        assert_eq!(Error::NotFound(42).to_string(), "Post 42 not found");
    }

    #[test]
    fn test_upstream_classification() {
        assert!(Error::Storage("boom".to_string()).is_upstream());
        assert!(Error::Cdn("boom".to_string()).is_upstream());
        assert!(!Error::InvalidInput("caption".to_string()).is_upstream());
        assert!(!Error::NotFound(1).is_upstream());
    }
}
