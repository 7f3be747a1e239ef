//! 认证/授权检查
//!
//! 由 [`crate::router::Router::dispatch`] 在匹配到路由后、调用处理函数前执行：
//!
//! | 情况 | 结果 |
//! |------|------|
//! | 无 Authorization 头 / 非 `Bearer ` 前缀 | 401 |
//! | 令牌签名错误、格式错误、已过期 | 401 |
//! | 角色不匹配 | 403 |

use shared::models::Role;

use super::{CurrentUser, TokenService};
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// 校验 `Authorization` 头，返回调用者
pub fn authenticate(tokens: &TokenService, authorization: Option<&str>, path: &str) -> AppResult<CurrentUser> {
    let Some(token) = authorization.and_then(TokenService::extract_from_header) else {
        security_log!("WARN", "auth_missing", path = path);
        return Err(AppError::Unauthorized);
    };

    tokens.verify(token).map_err(|e| {
        security_log!("WARN", "auth_failed", error = e.to_string(), path = path);
        AppError::Unauthorized
    })
}

/// 要求特定角色
pub fn require_role(user: &CurrentUser, required: Role, path: &str) -> AppResult<()> {
    if user.role == required {
        return Ok(());
    }
    security_log!(
        "WARN",
        "role_denied",
        username = user.username.as_str(),
        role = user.role.as_str(),
        required = required.as_str(),
        path = path
    );
    Err(AppError::forbidden(format!("{} role required", required)))
}
