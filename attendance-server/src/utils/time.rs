//! 日期时间解析
//!
//! 请求里的日期为 `YYYY-MM-DD`，时间为不带时区的本地时间
//! `YYYY-MM-DDTHH:MM[:SS[.fff]]`。

use chrono::{NaiveDate, NaiveDateTime, Timelike};

const DATETIME_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), shared::models::DATE_FORMAT).ok()
}

/// 解析本地时间，秒可省略
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// 查询过滤条件: 接受完整时间或仅日期 (取当天 00:00)
pub fn parse_datetime_or_date(value: &str) -> Option<NaiveDateTime> {
    parse_datetime(value).or_else(|| parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// 当前本地日期
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// 当前本地时间 (精确到秒)
pub fn local_now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2023-01-01"), NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("01/01/2023"), None);
    }

    #[test]
    fn test_parse_datetime_with_and_without_seconds() {
        let expected = NaiveDate::from_ymd_opt(2026, 5, 4)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2026-05-04T09:30"), Some(expected));
        assert_eq!(parse_datetime("2026-05-04T09:30:00"), Some(expected));
        assert_eq!(parse_datetime("2026-05-04T09:30:00.000"), Some(expected));
        assert_eq!(parse_datetime("2026-05-04 09:30"), None);
        assert_eq!(parse_datetime("2026-05-04"), None);
    }

    #[test]
    fn test_parse_datetime_or_date() {
        let midnight = NaiveDate::from_ymd_opt(2026, 5, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_datetime_or_date("2026-05-04"), Some(midnight));
        assert_eq!(parse_datetime_or_date("2026-05-04T00:00"), Some(midnight));
        assert_eq!(parse_datetime_or_date("soon"), None);
    }
}
