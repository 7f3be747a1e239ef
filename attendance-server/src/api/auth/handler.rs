//! Authentication Handlers

use shared::json::JsonValue;

use crate::api::params::field_or_empty;
use crate::core::ServerState;
use crate::router::RequestContext;
use crate::utils::validation::{MAX_PASSWORD_LEN, MAX_USERNAME_LEN};
use crate::utils::{AppError, AppResult};

/// Login handler
///
/// 返回 `{token, role}`；未知用户与错误口令都返回 400 "Invalid credentials"
pub async fn login(state: &ServerState, ctx: RequestContext) -> AppResult<JsonValue> {
    let body = ctx.json_body()?;
    let username = field_or_empty(&body, "username")?;
    let password = field_or_empty(&body, "password")?;

    if username.is_empty() || username.len() > MAX_USERNAME_LEN || password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::invalid_credentials());
    }

    let result = state.accounts.login(&username, &password).await?;
    Ok(JsonValue::object([
        ("token", result.token.into()),
        ("role", result.role.as_str().into()),
    ]))
}
