//! Repository Module
//!
//! 每个实体一组自由函数，统一接收 `&dyn Store`。
//! 时间以 `YYYY-MM-DDTHH:MM:SS` 文本存储，字典序即时间序。

pub mod account;
pub mod employee;
pub mod leave_request;

use chrono::{NaiveDate, NaiveDateTime};
use shared::models::{DATE_FORMAT, DATETIME_FORMAT};
use thiserror::Error;

use super::{DbError, Row};
use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<DbError> for RepoError {
    fn from(err: DbError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) | RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// UNIQUE 约束冲突 (并发插入时 exists 检查可能被绕过)
pub(crate) fn is_unique_violation(err: &DbError) -> bool {
    matches!(err, DbError::Backend(msg) if msg.contains("UNIQUE constraint failed"))
}

pub(crate) fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub(crate) fn date_column(row: &Row, column: &str) -> RepoResult<NaiveDate> {
    let raw = row.text(column)?;
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| RepoError::Database(format!("column '{column}' is not a date ({raw:?}): {e}")))
}

pub(crate) fn datetime_column(row: &Row, column: &str) -> RepoResult<NaiveDateTime> {
    let raw = row.text(column)?;
    crate::utils::time::parse_datetime(raw)
        .ok_or_else(|| RepoError::Database(format!("column '{column}' is not a timestamp: {raw:?}")))
}
