//! Employee API Handlers

use shared::json::{JsonMap, JsonValue};
use shared::models::EmployeeInput;

use crate::api::params::text_field;
use crate::core::ServerState;
use crate::db::repository::employee;
use crate::leave::quota;
use crate::router::RequestContext;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, time};

fn deleted() -> JsonValue {
    JsonValue::object([("status", "deleted".into())])
}

/// 解析并校验 `{chineseName, englishName, hireDate}`
fn parse_input(body: &JsonMap) -> AppResult<EmployeeInput> {
    let chinese_name = text_field(body, "chineseName")?.unwrap_or_default();
    validate_required_text(&chinese_name, "chineseName", "Chinese name is required", MAX_NAME_LEN)?;

    let english_name = text_field(body, "englishName")?.unwrap_or_default();
    validate_required_text(&english_name, "englishName", "English name is required", MAX_NAME_LEN)?;

    let hire_date = text_field(body, "hireDate")?
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::validation("Hire date is required"))?;
    let hire_date = time::parse_date(&hire_date).ok_or_else(|| AppError::validation("Invalid hire date"))?;

    Ok(EmployeeInput {
        chinese_name: chinese_name.trim().to_string(),
        english_name: english_name.trim().to_string(),
        hire_date,
    })
}

/// List all employees ordered by id
pub async fn list(state: &ServerState, _ctx: RequestContext) -> AppResult<JsonValue> {
    let employees = employee::find_all(state.store()).await?;
    Ok(JsonValue::Array(employees.iter().map(|e| e.to_json()).collect()))
}

/// Create a new employee
pub async fn create(state: &ServerState, ctx: RequestContext) -> AppResult<JsonValue> {
    let input = parse_input(&ctx.json_body()?)?;
    let created = employee::create(state.store(), &input).await?;
    tracing::info!(employee_id = created.id, english_name = %created.english_name, "Employee created");
    Ok(created.to_json())
}

/// Update an employee
pub async fn update(state: &ServerState, ctx: RequestContext) -> AppResult<JsonValue> {
    let id = ctx.id_param("id")?;
    let input = parse_input(&ctx.json_body()?)?;
    let updated = employee::update(state.store(), id, &input).await?;
    tracing::info!(employee_id = id, "Employee updated");
    Ok(updated.to_json())
}

/// Delete an employee and its leave requests
pub async fn delete(state: &ServerState, ctx: RequestContext) -> AppResult<JsonValue> {
    let id = ctx.id_param("id")?;
    let _guard = state.locks.lock(id).await;
    if !employee::delete(state.store(), id).await? {
        return Err(AppError::not_found("Employee not found"));
    }
    state.locks.remove(id);
    tracing::info!(employee_id = id, "Employee deleted");
    Ok(deleted())
}

/// Annual leave summary for the current leave year
pub async fn annual_leave(state: &ServerState, ctx: RequestContext) -> AppResult<JsonValue> {
    let id = ctx.id_param("id")?;
    let found = employee::find_by_id(state.store(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;
    let summary = quota::annual_summary(state.store(), &found, time::local_today()).await?;
    Ok(summary.to_json())
}
