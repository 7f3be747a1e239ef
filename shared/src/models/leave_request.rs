//! Leave Request Model

use std::fmt;

use chrono::NaiveDateTime;

use super::DATETIME_FORMAT;
use crate::json::JsonValue;

/// 请假类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveType {
    /// 年假 (受年度额度限制)
    Annual,
    /// 病假 (每自然月 8 小时)
    Sick,
    Personal,
    Marriage,
    Maternity,
    Other,
}

impl LeaveType {
    pub const ALL: [LeaveType; 6] = [
        LeaveType::Annual,
        LeaveType::Sick,
        LeaveType::Personal,
        LeaveType::Marriage,
        LeaveType::Maternity,
        LeaveType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "ANNUAL",
            LeaveType::Sick => "SICK",
            LeaveType::Personal => "PERSONAL",
            LeaveType::Marriage => "MARRIAGE",
            LeaveType::Maternity => "MATERNITY",
            LeaveType::Other => "OTHER",
        }
    }

    /// 宽松解析: 去空白、忽略大小写，无法识别的名称归为 [`LeaveType::Other`]
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .unwrap_or(LeaveType::Other)
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已保存的请假记录 (创建后不可修改，只能删除)
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_id: i64,
    pub chinese_name: String,
    pub english_name: String,
    pub leave_type: LeaveType,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// 整小时数，至少 1
    pub hours: i64,
    pub created_at: NaiveDateTime,
}

/// Create leave request payload (already validated)
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRequest {
    pub english_name: String,
    pub leave_type: LeaveType,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub hours: i64,
}

impl LeaveRequest {
    pub fn to_json(&self) -> JsonValue {
        JsonValue::object([
            ("id", self.id.into()),
            ("employeeId", self.employee_id.into()),
            ("chineseName", self.chinese_name.as_str().into()),
            ("englishName", self.english_name.as_str().into()),
            ("type", self.leave_type.as_str().into()),
            ("startTime", self.start_time.format(DATETIME_FORMAT).to_string().into()),
            ("endTime", self.end_time.format(DATETIME_FORMAT).to_string().into()),
            ("hours", self.hours.into()),
            ("createdAt", self.created_at.format(DATETIME_FORMAT).to_string().into()),
        ])
    }
}
