//! 请求体字段读取

use shared::json::{JsonMap, JsonValue};

use crate::utils::{AppError, AppResult};

/// 字段的文本形式: 字符串原样返回，数字/布尔转为文本；缺失或 null 为 `None`
pub fn text_field(body: &JsonMap, field: &str) -> AppResult<Option<String>> {
    match body.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(value @ (JsonValue::Integer(_) | JsonValue::Float(_) | JsonValue::Bool(_))) => Ok(Some(value.to_string())),
        Some(JsonValue::Array(_) | JsonValue::Object(_)) => {
            Err(AppError::validation(format!("Field {field} must be a string")))
        }
    }
}

/// 必填字段，缺失时返回 "Missing required field: <field>"
pub fn required_field(body: &JsonMap, field: &str) -> AppResult<String> {
    text_field(body, field)?.ok_or_else(|| AppError::validation(format!("Missing required field: {field}")))
}

/// 可选字段，缺失时为空串
pub fn field_or_empty(body: &JsonMap, field: &str) -> AppResult<String> {
    Ok(text_field(body, field)?.unwrap_or_default())
}
