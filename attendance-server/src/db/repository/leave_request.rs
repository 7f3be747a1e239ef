//! Leave Request Repository

use chrono::NaiveDateTime;
use shared::models::{LeaveRequest, LeaveType};

use super::{RepoError, RepoResult, datetime_column, format_datetime};
use crate::db::{Row, SqlParam, Statement, Store};

const SELECT_JOINED: &str = "SELECT lr.id, lr.employee_id, e.chinese_name, e.english_name, lr.type, \
     lr.start_time, lr.end_time, lr.hours, lr.created_at \
     FROM leave_request lr JOIN employee e ON e.id = lr.employee_id";

/// 待插入的请假记录 (员工已解析，额度已校验)
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequestInsert {
    pub employee_id: i64,
    pub leave_type: LeaveType,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub hours: i64,
    pub created_at: NaiveDateTime,
}

/// 搜索过滤条件，全部可选
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaveRequestFilter {
    /// 英文名，不区分大小写
    pub english_name: Option<String>,
    /// 已转大写的类型名
    pub leave_type: Option<String>,
    /// start_time >= start
    pub start: Option<NaiveDateTime>,
    /// end_time <= end
    pub end: Option<NaiveDateTime>,
}

impl LeaveRequestFilter {
    fn where_clause(&self) -> (String, Vec<SqlParam>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();
        if let Some(name) = &self.english_name {
            conditions.push("e.english_name = ?");
            params.push(SqlParam::from(name.trim()));
        }
        if let Some(leave_type) = &self.leave_type {
            conditions.push("lr.type = ?");
            params.push(SqlParam::from(leave_type.as_str()));
        }
        if let Some(start) = &self.start {
            conditions.push("lr.start_time >= ?");
            params.push(SqlParam::from(format_datetime(start)));
        }
        if let Some(end) = &self.end {
            conditions.push("lr.end_time <= ?");
            params.push(SqlParam::from(format_datetime(end)));
        }
        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

/// 一页搜索结果
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequestPage {
    pub content: Vec<LeaveRequest>,
    pub total_elements: i64,
}

fn from_row(row: &Row) -> RepoResult<LeaveRequest> {
    Ok(LeaveRequest {
        id: row.int("id")?,
        employee_id: row.int("employee_id")?,
        chinese_name: row.text("chinese_name")?.to_string(),
        english_name: row.text("english_name")?.to_string(),
        leave_type: LeaveType::from_name(row.text("type")?),
        start_time: datetime_column(row, "start_time")?,
        end_time: datetime_column(row, "end_time")?,
        hours: row.int("hours")?,
        created_at: datetime_column(row, "created_at")?,
    })
}

pub async fn find_by_id(store: &dyn Store, id: i64) -> RepoResult<Option<LeaveRequest>> {
    let row = store
        .query_one(Statement::new(format!("{SELECT_JOINED} WHERE lr.id = ?")).bind(id))
        .await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn create(store: &dyn Store, data: &LeaveRequestInsert) -> RepoResult<LeaveRequest> {
    let row = store
        .query_one(
            Statement::new(
                "INSERT INTO leave_request (employee_id, type, start_time, end_time, hours, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
            )
            .bind(data.employee_id)
            .bind(data.leave_type.as_str())
            .bind(format_datetime(&data.start_time))
            .bind(format_datetime(&data.end_time))
            .bind(data.hours)
            .bind(format_datetime(&data.created_at)),
        )
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create leave request".into()))?;

    let id = row.int("id")?;
    find_by_id(store, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create leave request".into()))
}

/// Sum of hours for one employee and type with `from <= start_time < until`
pub async fn sum_hours(
    store: &dyn Store,
    employee_id: i64,
    leave_type: LeaveType,
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> RepoResult<i64> {
    let row = store
        .query_one(
            Statement::new(
                "SELECT COALESCE(SUM(hours), 0) AS total FROM leave_request \
                 WHERE employee_id = ? AND type = ? AND start_time >= ? AND start_time < ?",
            )
            .bind(employee_id)
            .bind(leave_type.as_str())
            .bind(format_datetime(&from))
            .bind(format_datetime(&until)),
        )
        .await?;
    match row {
        Some(row) => Ok(row.int("total")?),
        None => Ok(0),
    }
}

/// Filtered search ordered by `start_time DESC, id DESC`
pub async fn search(
    store: &dyn Store,
    filter: &LeaveRequestFilter,
    page: i64,
    size: i64,
) -> RepoResult<LeaveRequestPage> {
    let (where_clause, params) = filter.where_clause();

    let mut count = Statement::new(format!(
        "SELECT COUNT(*) AS total FROM leave_request lr JOIN employee e ON e.id = lr.employee_id{where_clause}"
    ));
    count.params = params.clone();
    let total_elements = match store.query_one(count).await? {
        Some(row) => row.int("total")?,
        None => 0,
    };

    let offset = page.max(0).saturating_mul(size);
    let mut select = Statement::new(format!(
        "{SELECT_JOINED}{where_clause} ORDER BY lr.start_time DESC, lr.id DESC LIMIT ? OFFSET ?"
    ));
    select.params = params;
    let select = select.bind(size).bind(offset);

    let content = store
        .query(select)
        .await?
        .iter()
        .map(from_row)
        .collect::<RepoResult<Vec<_>>>()?;

    Ok(LeaveRequestPage {
        content,
        total_elements,
    })
}

pub async fn delete(store: &dyn Store, id: i64) -> RepoResult<bool> {
    let affected = store
        .execute(Statement::new("DELETE FROM leave_request WHERE id = ?").bind(id))
        .await?;
    Ok(affected > 0)
}

pub async fn delete_by_employee(store: &dyn Store, employee_id: i64) -> RepoResult<u64> {
    Ok(store
        .execute(Statement::new("DELETE FROM leave_request WHERE employee_id = ?").bind(employee_id))
        .await?)
}
