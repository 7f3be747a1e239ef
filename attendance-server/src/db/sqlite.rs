//! SQLite [`Store`] implementation (sqlx)

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
    SqliteSynchronous,
};
use sqlx::{Column, Row as _, SqlitePool, TypeInfo, ValueRef};

use super::{DbError, Row, SqlParam, Statement, Store};

/// SQLite connection pool
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a file database with WAL and foreign keys enabled
    pub async fn open(db_path: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| DbError::Backend(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Backend(format!("Failed to open database: {e}")))?;

        tracing::info!(path = %db_path, "Database connection established (SQLite WAL, busy_timeout=5000ms)");
        Ok(Self { pool })
    }

    /// Private in-memory database (single connection so every statement sees the same data)
    pub async fn in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::Backend(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Backend(format!("Failed to open in-memory database: {e}")))?;
        Ok(Self { pool })
    }

    fn prepare(statement: &Statement) -> sqlx::query::Query<'_, sqlx::Sqlite, SqliteArguments<'_>> {
        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = match param {
                SqlParam::Int(v) => query.bind(*v),
                SqlParam::Text(v) => query.bind(v.as_str()),
            };
        }
        query
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn execute(&self, statement: Statement) -> Result<u64, DbError> {
        let result = Self::prepare(&statement)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::Backend(e.to_string()))?;
        Ok(result.rows_affected())
    }

    async fn query(&self, statement: Statement) -> Result<Vec<Row>, DbError> {
        let rows = Self::prepare(&statement)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DbError::Backend(e.to_string()))?;
        rows.iter().map(decode_row).collect()
    }
}

/// 动态类型列统一转成文本
fn decode_row(row: &SqliteRow) -> Result<Row, DbError> {
    let mut columns = Vec::with_capacity(row.columns().len());
    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row
            .try_get_raw(idx)
            .map_err(|e| DbError::Decode(e.to_string()))?;
        let is_null = raw.is_null();
        let kind = raw.type_info().name().to_string();

        let value = if is_null {
            String::new()
        } else {
            match kind.as_str() {
                "INTEGER" => row.try_get_unchecked::<i64, _>(idx).map(|v| v.to_string()),
                "REAL" => row.try_get_unchecked::<f64, _>(idx).map(|v| v.to_string()),
                _ => row.try_get_unchecked::<String, _>(idx),
            }
            .map_err(|e| DbError::Decode(format!("column '{}': {e}", column.name())))?
        };
        columns.push((column.name().to_string(), value));
    }
    Ok(Row::new(columns))
}
