//! Employee Repository

use shared::models::{Employee, EmployeeInput};

use super::{RepoError, RepoResult, date_column, format_date, is_unique_violation};
use crate::db::{Row, Statement, Store};

const COLUMNS: &str = "id, chinese_name, english_name, hire_date";

const DUPLICATE_NAME: &str = "English name already exists";

fn from_row(row: &Row) -> RepoResult<Employee> {
    Ok(Employee {
        id: row.int("id")?,
        chinese_name: row.text("chinese_name")?.to_string(),
        english_name: row.text("english_name")?.to_string(),
        hire_date: date_column(row, "hire_date")?,
    })
}

pub async fn find_all(store: &dyn Store) -> RepoResult<Vec<Employee>> {
    let rows = store
        .query(Statement::new(format!("SELECT {COLUMNS} FROM employee ORDER BY id")))
        .await?;
    rows.iter().map(from_row).collect()
}

pub async fn find_by_id(store: &dyn Store, id: i64) -> RepoResult<Option<Employee>> {
    let row = store
        .query_one(Statement::new(format!("SELECT {COLUMNS} FROM employee WHERE id = ?")).bind(id))
        .await?;
    row.as_ref().map(from_row).transpose()
}

/// Case-insensitive lookup (english_name is `COLLATE NOCASE`)
pub async fn find_by_english_name(store: &dyn Store, english_name: &str) -> RepoResult<Option<Employee>> {
    let row = store
        .query_one(
            Statement::new(format!("SELECT {COLUMNS} FROM employee WHERE english_name = ? LIMIT 1"))
                .bind(english_name.trim()),
        )
        .await?;
    row.as_ref().map(from_row).transpose()
}

async fn english_name_taken(store: &dyn Store, english_name: &str, exclude_id: Option<i64>) -> RepoResult<bool> {
    let existing = find_by_english_name(store, english_name).await?;
    Ok(existing.is_some_and(|e| Some(e.id) != exclude_id))
}

pub async fn create(store: &dyn Store, data: &EmployeeInput) -> RepoResult<Employee> {
    if english_name_taken(store, &data.english_name, None).await? {
        return Err(RepoError::Duplicate(DUPLICATE_NAME.into()));
    }

    let row = store
        .query_one(
            Statement::new(
                "INSERT INTO employee (chinese_name, english_name, hire_date) VALUES (?, ?, ?) RETURNING id",
            )
            .bind(data.chinese_name.trim())
            .bind(data.english_name.trim())
            .bind(format_date(&data.hire_date)),
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::Duplicate(DUPLICATE_NAME.into())
            } else {
                e.into()
            }
        })?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))?;

    let id = row.int("id")?;
    find_by_id(store, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

pub async fn update(store: &dyn Store, id: i64, data: &EmployeeInput) -> RepoResult<Employee> {
    if find_by_id(store, id).await?.is_none() {
        return Err(RepoError::NotFound("Employee not found".into()));
    }
    if english_name_taken(store, &data.english_name, Some(id)).await? {
        return Err(RepoError::Duplicate(DUPLICATE_NAME.into()));
    }

    store
        .execute(
            Statement::new("UPDATE employee SET chinese_name = ?, english_name = ?, hire_date = ? WHERE id = ?")
                .bind(data.chinese_name.trim())
                .bind(data.english_name.trim())
                .bind(format_date(&data.hire_date))
                .bind(id),
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::Duplicate(DUPLICATE_NAME.into())
            } else {
                e.into()
            }
        })?;

    find_by_id(store, id)
        .await?
        .ok_or_else(|| RepoError::NotFound("Employee not found".into()))
}

/// Delete an employee together with its leave requests
pub async fn delete(store: &dyn Store, id: i64) -> RepoResult<bool> {
    if find_by_id(store, id).await?.is_none() {
        return Ok(false);
    }
    let removed = super::leave_request::delete_by_employee(store, id).await?;
    let affected = store
        .execute(Statement::new("DELETE FROM employee WHERE id = ?").bind(id))
        .await?;
    tracing::debug!(employee_id = id, leave_requests = removed, "Employee deleted");
    Ok(affected > 0)
}
