//! Leave Request API Handlers
//!
//! 创建时的校验顺序:
//!
//! 1. 必填字段 (englishName, startTime, endTime, hours)
//! 2. 时间格式，小时数为数字
//! 3. 至少 1 小时、整小时、结束不早于开始
//! 4. 员工存在 (英文名不区分大小写)
//! 5. 请假类型
//! 6. 额度 (同员工加锁后重新确认员工存在，再校验并插入)

use chrono::NaiveDateTime;
use shared::json::{JsonMap, JsonValue};
use shared::models::{LeaveType, NewLeaveRequest};

use crate::api::params::{required_field, text_field};
use crate::core::ServerState;
use crate::db::repository::employee;
use crate::db::repository::leave_request::{self, LeaveRequestFilter, LeaveRequestInsert};
use crate::leave::quota;
use crate::router::RequestContext;
use crate::utils::{AppError, AppResult, time};

const DEFAULT_PAGE: i64 = 0;
const DEFAULT_PAGE_SIZE: i64 = 20;

/// 整小时判定容差
const WHOLE_HOUR_EPSILON: f64 = 1e-6;

/// 单条记录小时数上限，保证按月/按年求和不会溢出
const MAX_LEAVE_HOURS: i64 = i32::MAX as i64;

fn parse_timestamp(value: &str, field: &str) -> AppResult<NaiveDateTime> {
    time::parse_datetime(value).ok_or_else(|| AppError::validation(format!("Invalid {field}")))
}

/// 小时数: JSON 数字或数字字符串，必须为不小于 1 的整数
fn parse_hours(body: &JsonMap) -> AppResult<i64> {
    let hours = match body.get("hours") {
        Some(JsonValue::Integer(n)) => *n as f64,
        Some(JsonValue::Float(f)) => *f,
        Some(JsonValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| AppError::validation("Hours must be a number"))?,
        _ => return Err(AppError::validation("Hours must be a number")),
    };
    if hours < 1.0 {
        return Err(AppError::validation("Minimum leave duration is 1 hour"));
    }
    if (hours - hours.round()).abs() >= WHOLE_HOUR_EPSILON {
        return Err(AppError::validation("Hours must be in whole hours"));
    }
    if hours > MAX_LEAVE_HOURS as f64 {
        return Err(AppError::validation("Hours must be a number"));
    }
    Ok(hours.round() as i64)
}

/// 与员工无关的字段
#[derive(Debug)]
struct RequestFields {
    english_name: String,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    hours: i64,
}

/// 解析并校验请求体 (不含员工、类型与额度)
fn parse_fields(body: &JsonMap) -> AppResult<RequestFields> {
    let english_name = required_field(body, "englishName")?;
    let start_raw = required_field(body, "startTime")?;
    let end_raw = required_field(body, "endTime")?;
    if body.get("hours").is_none_or(JsonValue::is_null) {
        return Err(AppError::validation("Missing required field: hours"));
    }

    let start_time = parse_timestamp(&start_raw, "startTime")?;
    let end_time = parse_timestamp(&end_raw, "endTime")?;
    let hours = parse_hours(body)?;

    if end_time < start_time {
        return Err(AppError::validation("End time must not be before start time"));
    }

    Ok(RequestFields {
        english_name: english_name.trim().to_string(),
        start_time,
        end_time,
        hours,
    })
}

fn parse_leave_type(body: &JsonMap) -> AppResult<LeaveType> {
    let raw = text_field(body, "type")?.ok_or_else(|| AppError::validation("Leave type is required"))?;
    Ok(LeaveType::from_name(&raw))
}

/// Create a leave request
pub async fn create(state: &ServerState, ctx: RequestContext) -> AppResult<JsonValue> {
    let body = ctx.json_body()?;
    let fields = parse_fields(&body)?;

    let owner = employee::find_by_english_name(state.store(), &fields.english_name)
        .await?
        .ok_or_else(|| AppError::validation("Employee not found"))?;
    let request = NewLeaveRequest {
        english_name: owner.english_name.clone(),
        leave_type: parse_leave_type(&body)?,
        start_time: fields.start_time,
        end_time: fields.end_time,
        hours: fields.hours,
    };

    let _guard = state.locks.lock(owner.id).await;
    // 等锁期间员工可能已被删除
    if employee::find_by_id(state.store(), owner.id).await?.is_none() {
        return Err(AppError::validation("Employee not found"));
    }
    quota::validate(
        state.store(),
        &owner,
        request.leave_type,
        request.start_time,
        request.hours,
        time::local_today(),
    )
    .await?;

    let created = leave_request::create(
        state.store(),
        &LeaveRequestInsert {
            employee_id: owner.id,
            leave_type: request.leave_type,
            start_time: request.start_time,
            end_time: request.end_time,
            hours: request.hours,
            created_at: time::local_now(),
        },
    )
    .await?;

    tracing::info!(
        leave_request_id = created.id,
        employee_id = owner.id,
        leave_type = %created.leave_type,
        hours = created.hours,
        submitted_by = ctx.user.as_ref().map(|u| u.username.as_str()).unwrap_or_default(),
        "Leave request created"
    );
    Ok(created.to_json())
}

fn filter_date(ctx: &RequestContext, name: &str) -> AppResult<Option<NaiveDateTime>> {
    ctx.query_param(name)
        .map(|v| time::parse_datetime_or_date(v).ok_or_else(|| AppError::validation(format!("Invalid {name}"))))
        .transpose()
}

/// 非法数字回落到默认值
fn int_param(ctx: &RequestContext, name: &str, default: i64) -> i64 {
    ctx.query_param(name)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Search leave requests
pub async fn search(state: &ServerState, ctx: RequestContext) -> AppResult<JsonValue> {
    let page = int_param(&ctx, "page", DEFAULT_PAGE);
    let size = int_param(&ctx, "size", DEFAULT_PAGE_SIZE);
    if size <= 0 {
        return Err(AppError::validation("Page size must be greater than zero"));
    }

    let filter = LeaveRequestFilter {
        english_name: ctx.query_param("englishName").map(|v| v.trim().to_string()),
        leave_type: ctx.query_param("type").map(|v| v.trim().to_uppercase()),
        start: filter_date(&ctx, "start")?,
        end: filter_date(&ctx, "end")?,
    };

    let result = leave_request::search(state.store(), &filter, page, size).await?;
    Ok(JsonValue::object([
        ("content", JsonValue::Array(result.content.iter().map(|r| r.to_json()).collect())),
        ("page", page.into()),
        ("size", size.into()),
        ("totalElements", result.total_elements.into()),
    ]))
}

/// Delete a leave request
pub async fn delete(state: &ServerState, ctx: RequestContext) -> AppResult<JsonValue> {
    let id = ctx.id_param("id")?;
    if !leave_request::delete(state.store(), id).await? {
        return Err(AppError::not_found("Leave request not found"));
    }
    tracing::info!(leave_request_id = id, "Leave request deleted");
    Ok(JsonValue::object([("status", "deleted".into())]))
}
