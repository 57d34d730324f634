//! Grain state storage
//!
//! The manager owns the document protocol; the provider layers typed
//! serialization on top for callers holding concrete state types.

pub mod manager;
pub mod provider;

pub use manager::GrainDocumentManager;
pub use provider::MongoGrainStorage;
