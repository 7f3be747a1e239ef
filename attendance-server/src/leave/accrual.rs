//! 年假累计
//!
//! 假期年度: 4 月 1 日至次年 3 月 31 日。对年度内每个月 (月初 >= 入职日):
//!
//! - 固定月度累计 1/12 天
//! - 入职满 6 个自然月后，基础额度按 10/12 天/月累计，总计不超过 10 天
//!
//! 总额度 = 基础额度 + 月度累计；已用 = 年度内 ANNUAL 小时数 / 8；
//! 剩余 = max(0, 总额度 - 已用)。对外数值均四舍五入到两位小数。

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::*;
use shared::models::AnnualLeaveSummary;

const DECIMAL_PLACES: u32 = 2;

/// 基础额度 (天)
const BASE_QUOTA_DAYS: i64 = 10;

/// 入职满多少个月开始累计基础额度
const BASE_QUOTA_AFTER_MONTHS: i32 = 6;

/// 每天工时
pub const HOURS_PER_DAY: i64 = 8;

/// 假期年度 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveYear {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LeaveYear {
    /// 包含 `today` 的假期年度
    pub fn containing(today: NaiveDate) -> Self {
        let year = if today.month() >= 4 {
            today.year()
        } else {
            today.year() - 1
        };
        Self {
            start: first_of_month(year, 4),
            end: first_of_month(year + 1, 4),
        }
    }

    /// 年度内每个月的月初
    pub fn months(&self) -> impl Iterator<Item = NaiveDate> {
        let start_year = self.start.year();
        (0..12).map(move |offset| {
            let month0 = 3 + offset;
            first_of_month(start_year + month0 / 12, (month0 % 12) as u32 + 1)
        })
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start.and_time(chrono::NaiveTime::MIN)
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end.and_time(chrono::NaiveTime::MIN)
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// 自然月差 (忽略日)
fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// 未取整的年假明细 (天)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnualLeaveBalance {
    pub total_quota: Decimal,
    pub used_days: Decimal,
    pub remaining_days: Decimal,
}

impl AnnualLeaveBalance {
    /// 剩余天数 (两位小数)，额度校验以此为准
    pub fn remaining_rounded(&self) -> Decimal {
        round(self.remaining_days)
    }

    pub fn to_summary(&self) -> AnnualLeaveSummary {
        AnnualLeaveSummary {
            total_quota: to_f64(self.total_quota),
            used_days: to_f64(self.used_days),
            remaining_days: to_f64(self.remaining_days),
        }
    }
}

/// 当前年度累计额度 (天，未取整)
pub fn accrued_quota(hire_date: NaiveDate, year: &LeaveYear) -> Decimal {
    let eligible: Vec<NaiveDate> = year.months().filter(|m| *m >= hire_date).collect();
    let base_months = eligible
        .iter()
        .filter(|m| months_between(hire_date, **m) >= BASE_QUOTA_AFTER_MONTHS)
        .count();

    let twelve = Decimal::from(12);
    let base_cap = Decimal::from(BASE_QUOTA_DAYS);
    let base = (base_cap * Decimal::from(base_months) / twelve).min(base_cap);
    let monthly = Decimal::from(eligible.len()) / twelve;
    base + monthly
}

/// 年假明细: 纯函数，`used_hours` 为年度内已登记的 ANNUAL 小时数
pub fn balance(hire_date: NaiveDate, today: NaiveDate, used_hours: i64) -> AnnualLeaveBalance {
    let year = LeaveYear::containing(today);
    let total_quota = accrued_quota(hire_date, &year);
    let used_days = Decimal::from(used_hours) / Decimal::from(HOURS_PER_DAY);
    let remaining_days = (total_quota - used_days).max(Decimal::ZERO);
    AnnualLeaveBalance {
        total_quota,
        used_days,
        remaining_days,
    }
}

pub fn summarize(hire_date: NaiveDate, today: NaiveDate, used_hours: i64) -> AnnualLeaveSummary {
    balance(hire_date, today, used_hours).to_summary()
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_else(|| {
        tracing::error!(value = %value, "Leave balance not representable as f64");
        0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_leave_year_boundaries() {
        assert_eq!(LeaveYear::containing(date(2026, 4, 1)).start, date(2026, 4, 1));
        assert_eq!(LeaveYear::containing(date(2026, 3, 31)).start, date(2025, 4, 1));
        assert_eq!(LeaveYear::containing(date(2026, 12, 31)).end, date(2027, 4, 1));

        let months: Vec<_> = LeaveYear::containing(date(2026, 10, 16)).months().collect();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], date(2026, 4, 1));
        assert_eq!(months[8], date(2026, 12, 1));
        assert_eq!(months[9], date(2027, 1, 1));
        assert_eq!(months[11], date(2027, 3, 1));
    }

    #[test]
    fn test_six_months_before_year_start_gets_full_quota() {
        // 入职 2025-10-01，年度 2026-04 起每个月都满 6 个月
        let summary = summarize(date(2025, 10, 1), date(2026, 5, 10), 0);
        assert_eq!(summary.total_quota, 11.0);
        assert_eq!(summary.used_days, 0.0);
        assert_eq!(summary.remaining_days, 11.0);
    }

    #[test]
    fn test_base_quota_vests_from_sixth_month() {
        // 入职 2026-04-01: 4 月到次年 3 月都计月度累计 (12/12 = 1)；
        // 10 月起满 6 个月，基础额度累计 6 个月 = 5 天
        let total = accrued_quota(date(2026, 4, 1), &LeaveYear::containing(date(2026, 6, 1)));
        assert_eq!(total, Decimal::from(6));

        // 月中入职: 当月月初早于入职日，不计
        let mid = summarize(date(2026, 4, 15), date(2026, 6, 1), 0);
        assert_eq!(mid.total_quota, 5.92);
    }

    #[test]
    fn test_long_tenure_capped() {
        let summary = summarize(date(2015, 1, 1), date(2026, 10, 16), 0);
        assert_eq!(summary.total_quota, 11.0);
    }

    #[test]
    fn test_hired_today_on_last_month_has_no_quota() {
        let today = date(2027, 3, 15);
        let summary = summarize(today, today, 0);
        assert_eq!(summary.total_quota, 0.0);
        assert_eq!(summary.remaining_days, 0.0);
    }

    #[test]
    fn test_hired_after_year_end_has_no_quota() {
        let summary = summarize(date(2030, 1, 1), date(2026, 10, 16), 0);
        assert_eq!(summary.total_quota, 0.0);
    }

    #[test]
    fn test_quota_grows_monotonically_with_tenure() {
        let year = LeaveYear::containing(date(2026, 10, 16));
        let mut previous = Decimal::ZERO;
        // 越早入职，本年度累计越多
        for months_before in 0..24 {
            let hire = year
                .start
                .checked_sub_months(chrono::Months::new(months_before))
                .unwrap();
            let quota = accrued_quota(hire, &year);
            assert!(quota >= previous, "quota dropped at {hire}");
            previous = quota;
        }
        assert_eq!(round(previous), Decimal::from(11));
    }

    #[test]
    fn test_used_and_remaining() {
        let summary = summarize(date(2023, 1, 1), date(2026, 10, 16), 12);
        assert_eq!(summary.used_days, 1.5);
        assert_eq!(summary.remaining_days, 9.5);

        let overdrawn = summarize(date(2023, 1, 1), date(2026, 10, 16), 200);
        assert_eq!(overdrawn.used_days, 25.0);
        assert_eq!(overdrawn.remaining_days, 0.0);
    }

    #[test]
    fn test_rounding_half_up() {
        // 5/12 = 0.41666.. -> 0.42, 1 小时 = 0.125 天 -> 0.13
        let summary = summarize(date(2026, 11, 1), date(2026, 10, 16), 1);
        assert_eq!(summary.total_quota, 0.42);
        assert_eq!(summary.used_days, 0.13);
        assert_eq!(summary.remaining_days, 0.29);
    }
}
