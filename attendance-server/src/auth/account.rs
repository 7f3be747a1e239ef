//! Account Service - 登录与账户初始化

use std::sync::Arc;

use chrono::Duration;
use shared::models::Role;

use super::{HashedPassword, PasswordHasher, TokenService};
use crate::db::Store;
use crate::db::repository::account;
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// 内置管理员账户
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// 登录成功结果
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResult {
    pub token: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    token_validity: Duration,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn Store>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        token_validity: Duration,
    ) -> Self {
        Self {
            store,
            tokens,
            hasher,
            token_validity,
        }
    }

    /// 用户名或口令错误统一返回 "Invalid credentials"
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResult> {
        let Some(found) = account::find_by_username(self.store.as_ref(), username).await? else {
            security_log!("WARN", "login_failed", username = username, reason = "unknown_user");
            return Err(AppError::invalid_credentials());
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let stored = HashedPassword {
            hash: found.password_hash.clone(),
            salt: found.salt.clone(),
        };
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| AppError::internal(format!("password verification task failed: {e}")))?;

        if !matches {
            security_log!("WARN", "login_failed", username = username, reason = "bad_password");
            return Err(AppError::invalid_credentials());
        }

        let token = self
            .tokens
            .issue(&found.username, found.role, self.token_validity)
            .map_err(|e| AppError::internal(e.to_string()))?;
        security_log!("INFO", "login_success", username = found.username.as_str(), role = found.role.as_str());

        Ok(LoginResult {
            token,
            role: found.role,
        })
    }

    /// 创建账户，返回新 id
    pub async fn register(&self, username: &str, password: &str, role: Role) -> AppResult<i64> {
        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AppError::internal(format!("password hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(e.to_string()))?;

        let id = account::create(self.store.as_ref(), username, &hashed.hash, &hashed.salt, role).await?;
        tracing::info!(username = %username, role = %role, "Account created");
        Ok(id)
    }

    /// 确保内置管理员存在，返回是否新建
    pub async fn ensure_admin(&self) -> AppResult<bool> {
        if account::find_by_username(self.store.as_ref(), DEFAULT_ADMIN_USERNAME)
            .await?
            .is_some()
        {
            return Ok(false);
        }
        match self
            .register(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD, Role::Admin)
            .await
        {
            Ok(_) => {
                tracing::warn!("Default admin account created, change its password before production use");
                Ok(true)
            }
            // 并发启动时另一实例已创建
            Err(AppError::Validation(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

