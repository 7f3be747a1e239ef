//! Annual Leave Summary (derived, never persisted)

use crate::json::JsonValue;

/// 当前假期年度的年假汇总，单位: 天 (两位小数)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualLeaveSummary {
    pub total_quota: f64,
    pub used_days: f64,
    pub remaining_days: f64,
}

impl AnnualLeaveSummary {
    pub fn to_json(&self) -> JsonValue {
        JsonValue::object([
            ("totalQuota", self.total_quota.into()),
            ("usedDays", self.used_days.into()),
            ("remainingDays", self.remaining_days.into()),
        ])
    }
}
