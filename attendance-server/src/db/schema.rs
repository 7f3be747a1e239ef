//! Schema bootstrap
//!
//! `CREATE TABLE IF NOT EXISTS` only; no migration history.

use super::{DbError, Statement, Store};

const TABLES: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS user_account (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        salt TEXT NOT NULL,
        role TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS employee (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        chinese_name TEXT NOT NULL,
        english_name TEXT NOT NULL UNIQUE COLLATE NOCASE,
        hire_date TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS leave_request (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id INTEGER NOT NULL,
        type TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        hours INTEGER NOT NULL CHECK (hours >= 1),
        created_at TEXT NOT NULL,
        FOREIGN KEY(employee_id) REFERENCES employee(id) ON DELETE CASCADE
    )",
];

const INDEXES: [&str; 1] = [
    "CREATE INDEX IF NOT EXISTS idx_leave_request_employee_type_start
        ON leave_request (employee_id, type, start_time)",
];

/// Create all tables and indexes (idempotent)
pub async fn initialize(store: &dyn Store) -> Result<(), DbError> {
    for sql in TABLES.iter().chain(INDEXES.iter()) {
        store.execute(Statement::new(*sql)).await?;
    }
    tracing::info!("Database schema ready");
    Ok(())
}
