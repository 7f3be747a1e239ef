//! Data models
//!
//! Shared between attendance-server handlers and tests.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).
//! JSON rendering goes through [`crate::json::JsonValue`] with camelCase keys.

pub mod employee;
pub mod leave_request;
pub mod leave_summary;
pub mod role;

// Re-exports
pub use employee::*;
pub use leave_request::*;
pub use leave_summary::*;
pub use role::*;

/// 日期格式 (ISO-8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 时间格式 (ISO-8601 local date-time, 无时区)
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
