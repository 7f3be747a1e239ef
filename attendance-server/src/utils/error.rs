//! 统一错误处理
//!
//! 业务代码在违反约束的地方返回 [`AppError`]，由路由分发边界
//! ([`crate::router::dispatch`]) 统一映射为 HTTP 状态码。
//!
//! | 变体 | HTTP 状态码 | 响应 message |
//! |------|------------|--------------|
//! | Validation | 400 | 原始信息 |
//! | Unauthorized | 401 | Unauthorized |
//! | Forbidden | 403 | Forbidden |
//! | NotFound | 404 | 原始信息 |
//! | Database / Internal | 500 | Internal server error (详情只写日志) |

use http::StatusCode;
use shared::json::JsonError;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 客户端错误 (4xx) ==========
    #[error("Validation failed: {0}")]
    /// 输入缺失/格式错误/业务规则不满足 (400)
    Validation(String),

    #[error("Authentication required")]
    /// 缺少、无效或过期的令牌 (401)
    Unauthorized,

    #[error("Permission denied: {0}")]
    /// 角色不匹配 (403)
    Forbidden(String),

    #[error("Resource not found: {0}")]
    /// 路由不存在或实体不存在 (404)
    NotFound(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 存储层错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 其他内部错误 (500)
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Unified message for failed logins, prevents username enumeration
    pub fn invalid_credentials() -> Self {
        Self::Validation("Invalid credentials".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给客户端的信息，5xx 不暴露内部细节
    pub fn client_message(&self) -> &str {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg,
            AppError::Unauthorized => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Database(_) | AppError::Internal(_) => "Internal server error",
        }
    }
}

impl From<JsonError> for AppError {
    fn from(e: JsonError) -> Self {
        match e {
            JsonError::Parse { .. } => AppError::Validation(e.to_string()),
            JsonError::UnsupportedType(msg) => AppError::Internal(format!("Unserializable response: {msg}")),
        }
    }
}
