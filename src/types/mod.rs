//! Shared types for Granary

mod error;

pub use error::{GranaryError, Result};
