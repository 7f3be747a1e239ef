//! Employee Model

use chrono::NaiveDate;

use super::DATE_FORMAT;
use crate::json::JsonValue;

/// 员工档案
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    /// 中文名
    pub chinese_name: String,
    /// 英文名 (不区分大小写唯一)
    pub english_name: String,
    pub hire_date: NaiveDate,
}

/// Create / update employee payload
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeInput {
    pub chinese_name: String,
    pub english_name: String,
    pub hire_date: NaiveDate,
}

impl Employee {
    pub fn to_json(&self) -> JsonValue {
        JsonValue::object([
            ("id", self.id.into()),
            ("chineseName", self.chinese_name.as_str().into()),
            ("englishName", self.english_name.as_str().into()),
            ("hireDate", self.hire_date.format(DATE_FORMAT).to_string().into()),
        ])
    }
}
