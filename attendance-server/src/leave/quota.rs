//! 请假额度校验 (插入前执行)
//!
//! - ANNUAL: 申请天数 (hours / 8) 超过当前剩余天数 1e-6 以上则拒绝
//! - SICK: 同一自然月内已登记 + 本次超过 8 小时则拒绝
//! - 其他类型不限额

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use shared::models::{AnnualLeaveSummary, Employee, LeaveType};

use super::accrual::{self, HOURS_PER_DAY, LeaveYear};
use crate::db::Store;
use crate::db::repository::leave_request;
use crate::utils::{AppError, AppResult};

/// 每自然月病假上限 (小时)
pub const SICK_HOURS_PER_MONTH: i64 = 8;

/// 比较容差 1e-6 天
fn tolerance() -> Decimal {
    Decimal::new(1, 6)
}

/// 员工当前假期年度的年假明细
pub async fn annual_balance(
    store: &dyn Store,
    employee: &Employee,
    today: NaiveDate,
) -> AppResult<accrual::AnnualLeaveBalance> {
    let year = LeaveYear::containing(today);
    let used_hours = leave_request::sum_hours(
        store,
        employee.id,
        LeaveType::Annual,
        year.start_time(),
        year.end_time(),
    )
    .await?;
    Ok(accrual::balance(employee.hire_date, today, used_hours))
}

pub async fn annual_summary(store: &dyn Store, employee: &Employee, today: NaiveDate) -> AppResult<AnnualLeaveSummary> {
    Ok(annual_balance(store, employee, today).await?.to_summary())
}

/// 自然月 `[月初, 下月初)`
fn month_range(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let first = day.with_day(1).unwrap_or(day);
    let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
    (first.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN))
}

/// 求和溢出按超额处理
fn exceeds_sick_cap(used: i64, hours: i64) -> bool {
    used.checked_add(hours).is_none_or(|total| total > SICK_HOURS_PER_MONTH)
}

/// 按类型校验额度
pub async fn validate(
    store: &dyn Store,
    employee: &Employee,
    leave_type: LeaveType,
    start_time: NaiveDateTime,
    hours: i64,
    today: NaiveDate,
) -> AppResult<()> {
    match leave_type {
        LeaveType::Annual => {
            let balance = annual_balance(store, employee, today).await?;
            let requested = Decimal::from(hours) / Decimal::from(HOURS_PER_DAY);
            if requested - balance.remaining_rounded() > tolerance() {
                tracing::info!(
                    employee_id = employee.id,
                    requested_hours = hours,
                    remaining_days = %balance.remaining_rounded(),
                    "Annual leave rejected"
                );
                return Err(AppError::validation("Insufficient annual leave balance"));
            }
        }
        LeaveType::Sick => {
            let (from, until) = month_range(start_time.date());
            let used = leave_request::sum_hours(store, employee.id, LeaveType::Sick, from, until).await?;
            if exceeds_sick_cap(used, hours) {
                tracing::info!(
                    employee_id = employee.id,
                    used_hours = used,
                    requested_hours = hours,
                    "Sick leave rejected"
                );
                return Err(AppError::validation("Monthly sick leave quota exceeded"));
            }
        }
        LeaveType::Personal | LeaveType::Marriage | LeaveType::Maternity | LeaveType::Other => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sick_cap() {
        assert!(!exceeds_sick_cap(5, 3));
        assert!(exceeds_sick_cap(5, 4));
        assert!(exceeds_sick_cap(1, i64::MAX));
        assert!(exceeds_sick_cap(i64::MAX, i64::MAX));
    }

    #[test]
    fn test_month_range() {
        let day = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let (from, until) = month_range(day);
        assert_eq!(from.to_string(), "2026-12-01 00:00:00");
        assert_eq!(until.to_string(), "2027-01-01 00:00:00");

        let (from, until) = month_range(NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
        assert_eq!(from.to_string(), "2028-02-01 00:00:00");
        assert_eq!(until.to_string(), "2028-03-01 00:00:00");
    }
}
