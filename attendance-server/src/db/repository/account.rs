//! User Account Repository

use shared::models::Role;

use super::{RepoError, RepoResult, is_unique_violation};
use crate::db::{Row, Statement, Store};

/// 登录账户 (口令摘要与盐均为 base64)
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub role: Role,
}

fn from_row(row: &Row) -> RepoResult<UserAccount> {
    let role = row.text("role")?;
    Ok(UserAccount {
        id: row.int("id")?,
        username: row.text("username")?.to_string(),
        password_hash: row.text("password_hash")?.to_string(),
        salt: row.text("salt")?.to_string(),
        role: role
            .parse()
            .map_err(|e| RepoError::Database(format!("user_account.role: {e}")))?,
    })
}

pub async fn find_by_username(store: &dyn Store, username: &str) -> RepoResult<Option<UserAccount>> {
    let row = store
        .query_one(
            Statement::new(
                "SELECT id, username, password_hash, salt, role FROM user_account WHERE username = ? LIMIT 1",
            )
            .bind(username),
        )
        .await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn create(
    store: &dyn Store,
    username: &str,
    password_hash: &str,
    salt: &str,
    role: Role,
) -> RepoResult<i64> {
    let row = store
        .query_one(
            Statement::new(
                "INSERT INTO user_account (username, password_hash, salt, role) VALUES (?, ?, ?, ?) RETURNING id",
            )
            .bind(username)
            .bind(password_hash)
            .bind(salt)
            .bind(role.as_str()),
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::Duplicate(format!("Username '{username}' already exists"))
            } else {
                e.into()
            }
        })?
        .ok_or_else(|| RepoError::Database("Failed to create account".into()))?;
    Ok(row.int("id")?)
}
