//! Configuration for Granary
//!
//! The hosting runtime hands the provider a flat map of string properties;
//! the two we require name the MongoDB connection and the database.

use std::collections::HashMap;

use crate::types::{GranaryError, Result};

/// Property key for the MongoDB connection string
pub const PROP_CONNECTION_STRING: &str = "ConnectionString";

/// Property key for the database name
pub const PROP_DATABASE: &str = "Database";

/// Connection parameters for the grain store
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// MongoDB connection URI
    pub connection_string: String,

    /// Database holding one collection per grain type
    pub database: String,
}

impl StorageConfig {
    /// Create a config directly from a URI and database name
    pub fn new(connection_string: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database: database.into(),
        }
    }

    /// Build a config from host-supplied provider properties
    ///
    /// Fails with a configuration error if either required property is
    /// missing; an adapter used without valid connection parameters must
    /// never reach the store.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self> {
        let connection_string = properties.get(PROP_CONNECTION_STRING);
        let database = properties.get(PROP_DATABASE);

        match (connection_string, database) {
            (Some(uri), Some(db)) => Ok(Self::new(uri, db)),
            _ => Err(GranaryError::Config(
                "ConnectionString or Database property not set".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_properties() {
        let config = StorageConfig::from_properties(&props(&[
            ("ConnectionString", "mongodb://localhost:27017"),
            ("Database", "grains"),
        ]))
        .unwrap();

        assert_eq!(config.connection_string, "mongodb://localhost:27017");
        assert_eq!(config.database, "grains");
    }

    #[test]
    fn test_missing_connection_string() {
        let err = StorageConfig::from_properties(&props(&[("Database", "grains")])).unwrap_err();
        assert!(matches!(err, GranaryError::Config(_)));
    }

    #[test]
    fn test_missing_database() {
        let err = StorageConfig::from_properties(&props(&[(
            "ConnectionString",
            "mongodb://localhost:27017",
        )]))
        .unwrap_err();
        assert!(matches!(err, GranaryError::Config(_)));
    }
}
