//! Shared types for the attendance service
//!
//! JSON value tree and codec plus the domain models rendered through it.

pub mod json;
pub mod models;

// Re-exports
pub use json::{JsonError, JsonMap, JsonValue};
