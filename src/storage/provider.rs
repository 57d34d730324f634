//! Typed grain storage facade
//!
//! Wraps the document manager with serde-based encoding so callers work in
//! their own state types. Decoding is parameterized explicitly by the target
//! type; the manager itself only ever sees documents and JSON strings.

use serde::{de::DeserializeOwned, Serialize};

use crate::config::StorageConfig;
use crate::db::MongoClient;
use crate::storage::GrainDocumentManager;
use crate::types::Result;

/// MongoDB-backed grain state storage
#[derive(Debug)]
pub struct MongoGrainStorage {
    manager: GrainDocumentManager,
}

impl MongoGrainStorage {
    /// Connect to the store described by `config`
    ///
    /// Fails with a database error if the server is unreachable; a storage
    /// instance that exists is always backed by a verified connection.
    pub async fn connect(config: StorageConfig) -> Result<Self> {
        let client = MongoClient::new(&config.connection_string, &config.database).await?;

        Ok(Self {
            manager: GrainDocumentManager::new(client),
        })
    }

    /// Read a grain's state, decoding into the caller's type
    ///
    /// `Ok(None)` means no state has been written yet.
    pub async fn read_state<T>(&self, grain_type: &str, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.manager.read(grain_type, key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Write a grain's state, replacing any prior state
    pub async fn write_state<T>(&self, grain_type: &str, key: &str, state: &T) -> Result<()>
    where
        T: Serialize,
    {
        let document = bson::to_document(state)?;
        self.manager.write(grain_type, key, document).await
    }

    /// Remove a grain's state, if any
    pub async fn clear_state(&self, grain_type: &str, key: &str) -> Result<()> {
        self.manager.delete(grain_type, key).await
    }

    /// Access the underlying document manager
    pub fn manager(&self) -> &GrainDocumentManager {
        &self.manager
    }
}
