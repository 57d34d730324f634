//! Error types for Granary

/// Main error type for grain storage operations
#[derive(Debug, thiserror::Error)]
pub enum GranaryError {
    /// Missing or invalid connection parameters. Fatal to the operation,
    /// never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store or transport failure, propagated verbatim from the driver.
    /// Uniqueness violations from a lost insert race surface here too.
    #[error("Database error: {0}")]
    Database(String),

    /// State encode/decode failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// Implement From conversions for common error types

impl From<mongodb::error::Error> for GranaryError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for GranaryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<bson::ser::Error> for GranaryError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for GranaryError {
    fn from(err: bson::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for grain storage operations
pub type Result<T> = std::result::Result<T, GranaryError>;
