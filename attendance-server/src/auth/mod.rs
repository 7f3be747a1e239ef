//! 认证授权模块
//!
//! - [`TokenService`] - HMAC-SHA256 签名令牌
//! - [`PasswordHasher`] - PBKDF2 口令哈希
//! - [`AccountService`] - 登录、账户创建、内置管理员
//! - [`guard`] - 路由分发时的认证/角色检查

pub mod account;
pub mod guard;
pub mod password;
pub mod token;

pub use account::{AccountService, LoginResult};
pub use password::{HashedPassword, PasswordError, PasswordHasher};
pub use token::{CurrentUser, TokenError, TokenService};
