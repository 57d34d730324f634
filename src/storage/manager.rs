//! Grain document manager
//!
//! Maps (grain type, identity) to the single MongoDB document holding that
//! grain's current state. Each grain type gets its own collection; within a
//! collection the identity lives in the reserved `__key` field, held under a
//! unique index so at most one document exists per identity.
//!
//! The unique index is bootstrapped lazily, once per grain type per manager
//! instance. The registration map only saves a listIndexes round-trip on
//! every call: two concurrent first-calls for the same type may both reach
//! `create_index`, which the server treats as a no-op when the spec matches
//! an existing index.

use bson::{doc, Bson, Document};
use dashmap::DashMap;
use mongodb::{options::IndexOptions, Collection, IndexModel};
use tracing::debug;

use crate::db::MongoClient;
use crate::types::Result;

/// Reserved field holding the grain identity inside each stored document
pub const KEY_FIELD: &str = "__key";

/// MongoDB's storage-assigned document identifier field
pub const ID_FIELD: &str = "_id";

/// Name of the unique index on [`KEY_FIELD`]
pub const KEY_INDEX_NAME: &str = "__key_1";

/// Interfaces with the MongoDB database on behalf of grain state callers
#[derive(Debug)]
pub struct GrainDocumentManager {
    client: MongoClient,
    /// Grain types whose unique key index has already been ensured
    ensured_indexes: DashMap<String, bool>,
}

impl GrainDocumentManager {
    /// Create a manager over an already-connected client
    pub fn new(client: MongoClient) -> Self {
        Self {
            client,
            ensured_indexes: DashMap::new(),
        }
    }

    /// Resolve the collection for a grain type, ensuring its key index
    ///
    /// The index check runs once per grain type for the lifetime of this
    /// manager. Losing the race to another caller costs a redundant
    /// `create_index`, never an error.
    pub async fn collection(&self, grain_type: &str) -> Result<Collection<Document>> {
        let collection = self.client.collection(grain_type);

        if !self.ensured_indexes.contains_key(grain_type) {
            self.ensure_key_index(grain_type, &collection).await?;
            self.ensured_indexes.insert(grain_type.to_string(), true);
        }

        Ok(collection)
    }

    async fn ensure_key_index(
        &self,
        grain_type: &str,
        collection: &Collection<Document>,
    ) -> Result<()> {
        // listIndexes fails with NamespaceNotFound when the collection does
        // not exist yet; create_index below creates both.
        let index_names = match collection.list_index_names().await {
            Ok(names) => names,
            Err(_) => Vec::new(),
        };

        if !index_names.iter().any(|name| name == KEY_INDEX_NAME) {
            debug!(
                "Creating unique '{}' index on collection '{}'",
                KEY_FIELD, grain_type
            );

            let index = IndexModel::builder()
                .keys(doc! { KEY_FIELD: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(KEY_INDEX_NAME.to_string())
                        .build(),
                )
                .build();

            collection.create_index(index).await?;
        }

        Ok(())
    }

    /// Read the stored state for a grain, if any
    ///
    /// Returns the state as a JSON string with the reserved `_id` and
    /// `__key` fields stripped. A missing document is `Ok(None)`, not an
    /// error; the caller treats it as "no state yet".
    pub async fn read(&self, grain_type: &str, key: &str) -> Result<Option<String>> {
        let collection = self.collection(grain_type).await?;

        let existing = collection.find_one(doc! { KEY_FIELD: key }).await?;

        match existing {
            Some(document) => Ok(Some(to_state_json(document))),
            None => Ok(None),
        }
    }

    /// Write the state document for a grain, replacing any prior state
    ///
    /// This is a full overwrite keyed by identity: fields present in the old
    /// document but absent from `state` do not survive. The read-then-
    /// replace-or-insert sequence is not atomic; once the unique key index
    /// is active, a lost insert race surfaces as a duplicate-key error from
    /// the server and is propagated to the caller.
    pub async fn write(&self, grain_type: &str, key: &str, state: Document) -> Result<()> {
        let collection = self.collection(grain_type).await?;

        let filter = doc! { KEY_FIELD: key };
        let existing = collection.find_one(filter.clone()).await?;

        let mut document = state;
        document.insert(KEY_FIELD, key);

        match existing {
            Some(prior) => {
                if let Some(id) = prior.get(ID_FIELD) {
                    document.insert(ID_FIELD, id.clone());
                }
                collection.replace_one(filter, document).await?;
            }
            None => {
                collection.insert_one(document).await?;
            }
        }

        Ok(())
    }

    /// Delete the stored state for a grain
    ///
    /// Deleting zero documents is success; the operation is idempotent.
    pub async fn delete(&self, grain_type: &str, key: &str) -> Result<()> {
        let collection = self.collection(grain_type).await?;

        collection.delete_one(doc! { KEY_FIELD: key }).await?;

        Ok(())
    }
}

/// Render a stored document as caller-facing state JSON
///
/// Strips the reserved fields so callers never see storage internals.
fn to_state_json(mut document: Document) -> String {
    document.remove(ID_FIELD);
    document.remove(KEY_FIELD);

    Bson::Document(document).into_relaxed_extjson().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn test_state_json_strips_reserved_fields() {
        let document = doc! {
            "_id": ObjectId::new(),
            "__key": "42",
            "balance": 100,
        };

        let json = to_state_json(document);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value, serde_json::json!({ "balance": 100 }));
    }

    #[test]
    fn test_state_json_preserves_caller_fields() {
        let document = doc! {
            "__key": "a",
            "name": "alice",
            "tags": ["x", "y"],
            "active": true,
        };

        let value: serde_json::Value = serde_json::from_str(&to_state_json(document)).unwrap();

        assert_eq!(value["name"], "alice");
        assert_eq!(value["tags"], serde_json::json!(["x", "y"]));
        assert_eq!(value["active"], true);
        assert!(value.get("__key").is_none());
        assert!(value.get("_id").is_none());
    }

    #[test]
    fn test_state_json_empty_document() {
        let document = doc! { "_id": ObjectId::new(), "__key": "gone" };

        assert_eq!(to_state_json(document), "{}");
    }
}
