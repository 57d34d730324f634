//! Granary - MongoDB persistence adapter for grain state
//!
//! Stores the serialized state of long-lived logical entities ("grains") as
//! one MongoDB document per (grain type, identity) pair. Each grain type maps
//! to its own collection; within a collection the identity is held in a
//! reserved `__key` field kept under a unique index, so at most one document
//! ever represents a grain's current state.
//!
//! ## Components
//!
//! - **Gateway**: thin wrapper over the MongoDB driver ([`db::mongo`])
//! - **Manager**: collection routing, index bootstrap, and the
//!   find/replace-or-insert protocol ([`storage::manager`])
//! - **Provider**: typed facade for callers holding concrete state types
//!   ([`storage::provider`])
//! - **Time codec**: epoch-seconds serde codec with legacy string fallback
//!   ([`time`])

pub mod config;
pub mod db;
pub mod storage;
pub mod time;
pub mod types;

pub use config::StorageConfig;
pub use storage::{GrainDocumentManager, MongoGrainStorage};
pub use types::{GranaryError, Result};
