//! Unified Result Types

use crate::AppError;

/// Application-level Result type
///
/// Used in handlers, services and repositories
pub type AppResult<T> = Result<T, AppError>;
