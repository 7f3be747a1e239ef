//! 无外部依赖的 JSON 编解码
//!
//! - [`parse`] - 文本 → [`JsonValue`]
//! - [`to_string`] - [`JsonValue`] → 紧凑文本
//!
//! # 解析规则
//!
//! | 输入 | 结果 |
//! |------|------|
//! | 含 `.` 或指数的数字 | [`JsonValue::Float`] |
//! | 其他数字 | [`JsonValue::Integer`] (超出 i64 为错误) |
//! | 浮点溢出为无穷大 | [`JsonError::Parse`] |
//! | 重复键 | 后写者胜，保留首次出现的位置 |
//! | 文档末尾多余内容 | [`JsonError::Parse`] |

mod parse;
mod value;
mod write;

pub use value::{JsonMap, JsonValue};

use thiserror::Error;

/// JSON 编解码错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonError {
    /// 输入文本格式错误
    #[error("invalid JSON at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// 值无法用 JSON 表示
    #[error("unsupported JSON value: {0}")]
    UnsupportedType(String),
}

/// 解析 JSON 文档
pub fn parse(text: &str) -> Result<JsonValue, JsonError> {
    parse::Parser::new(text).parse_document()
}

/// 解析 JSON 文档，要求顶层是对象
pub fn parse_object(text: &str) -> Result<JsonMap, JsonError> {
    match parse(text)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(JsonError::Parse {
            position: 0,
            message: format!("expected object but found {}", other.kind()),
        }),
    }
}

/// 序列化为紧凑 JSON 文本
pub fn to_string(value: &JsonValue) -> Result<String, JsonError> {
    let mut out = String::new();
    write::write_value(&mut out, value)?;
    Ok(out)
}

/// 转义字符串内容 (不含两侧引号)
pub fn escape_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    write::write_string(&mut out, value);
    out[1..out.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> JsonValue {
        JsonValue::object([
            ("id", 42.into()),
            ("chineseName", "张三".into()),
            ("englishName", "Zhang \"San\"\n".into()),
            ("ratio", 0.25.into()),
            ("whole", 11.0.into()),
            ("negative", (-7).into()),
            ("active", true.into()),
            ("note", JsonValue::Null),
            (
                "items",
                vec![JsonValue::from(1), JsonValue::from("two"), JsonValue::object([("z", 1.into()), ("a", 2.into())])].into(),
            ),
            ("control", "\u{0001}\u{0008}\u{000C}\t\r/".into()),
            ("emoji", "🦀".into()),
        ])
    }

    #[test]
    fn test_round_trip_preserves_order_and_numeric_kind() {
        let tree = sample_tree();
        let text = to_string(&tree).unwrap();
        let parsed = parse(&text).unwrap();

        assert_eq!(parsed, tree);
        let keys: Vec<_> = parsed.as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "id");
        assert_eq!(keys[keys.len() - 1], "emoji");
        assert_eq!(parsed.get("whole"), Some(&JsonValue::Float(11.0)));
        assert_eq!(parsed.get("id"), Some(&JsonValue::Integer(42)));
    }

    #[test]
    fn test_serialize_compact_form() {
        let value = JsonValue::object([
            ("status", "deleted".into()),
            ("list", vec![JsonValue::from(1), JsonValue::from(2.5)].into()),
            ("empty", JsonValue::object::<&str, _>([])),
        ]);
        assert_eq!(
            to_string(&value).unwrap(),
            r#"{"status":"deleted","list":[1,2.5],"empty":{}}"#
        );
        assert_eq!(to_string(&JsonValue::Float(11.0)).unwrap(), "11.0");
        assert_eq!(to_string(&JsonValue::from("a\u{001F}b")).unwrap(), "\"a\\u001fb\"");
    }

    #[test]
    fn test_serialize_rejects_non_finite() {
        assert!(matches!(
            to_string(&JsonValue::Float(f64::NAN)),
            Err(JsonError::UnsupportedType(_))
        ));
        let nested = JsonValue::Array(vec![JsonValue::Float(f64::INFINITY)]);
        assert!(matches!(to_string(&nested), Err(JsonError::UnsupportedType(_))));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse("8").unwrap(), JsonValue::Integer(8));
        assert_eq!(parse("-12").unwrap(), JsonValue::Integer(-12));
        assert_eq!(parse("8.0").unwrap(), JsonValue::Float(8.0));
        assert_eq!(parse("1e3").unwrap(), JsonValue::Float(1000.0));
        assert_eq!(parse("-2.5E-1").unwrap(), JsonValue::Float(-0.25));
        assert!(parse("99999999999999999999").is_err());
        assert!(matches!(parse("1e400"), Err(JsonError::Parse { .. })));
        assert!(matches!(parse("[-1e400]"), Err(JsonError::Parse { .. })));
        assert!(parse("-").is_err());
        assert!(parse("1.").is_err());
    }

    #[test]
    fn test_parse_escapes() {
        let parsed = parse(r#""\" \\ \/ \b \f \n \r \t é 🦀""#).unwrap();
        assert_eq!(parsed.as_str(), Some("\" \\ / \u{0008} \u{000C} \n \r \t é 🦀"));
    }

    #[test]
    fn test_parse_duplicate_keys_last_wins() {
        let parsed = parse(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        let map = parsed.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&JsonValue::Integer(3)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_whitespace_and_keywords() {
        let parsed = parse(" \n{ \"t\" : true ,\t\"f\":false, \"n\" : null , \"l\" : [ ] }\r\n").unwrap();
        assert_eq!(parsed.get("t"), Some(&JsonValue::Bool(true)));
        assert_eq!(parsed.get("f"), Some(&JsonValue::Bool(false)));
        assert_eq!(parsed.get("n"), Some(&JsonValue::Null));
        assert_eq!(parsed.get("l"), Some(&JsonValue::Array(vec![])));
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            "",
            "   ",
            r#"{"a":"unterminated"#,
            r#""bad \x escape""#,
            r#"{"a":1,}"#,
            r#"{"a" 1}"#,
            r#"[1 2]"#,
            r#"[1,2"#,
            r#"{"a":1} extra"#,
            r#"{a:1}"#,
            "tru",
            "nul",
            r#""\u12""#,
            r#""\ud83e""#,
            r#""\udd80""#,
        ];
        for case in cases {
            assert!(
                matches!(parse(case), Err(JsonError::Parse { .. })),
                "expected parse error for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_parse_object_requires_object() {
        assert!(parse_object(r#"{"username":"admin"}"#).is_ok());
        assert!(parse_object("[1]").is_err());
    }

    #[test]
    fn test_matches_serde_json_on_valid_documents() {
        let documents = [
            r#"{"englishName":"Zhang San","type":"ANNUAL","startTime":"2026-05-04T09:00:00","hours":8}"#,
            r#"[{"a":[1,2,{"b":null}]},"x",-3,4.5,true]"#,
            r#"{"nested":{"deep":{"deeper":["中文"]}}}"#,
        ];
        for doc in documents {
            let ours = to_string(&parse(doc).unwrap()).unwrap();
            let theirs: serde_json::Value = serde_json::from_str(doc).unwrap();
            let ours_reparsed: serde_json::Value = serde_json::from_str(&ours).unwrap();
            assert_eq!(ours_reparsed, theirs, "document {}", doc);
        }
    }

    #[test]
    fn test_escape_str() {
        assert_eq!(escape_str("a\"b"), "a\\\"b");
        assert_eq!(escape_str("plain"), "plain");
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let doc = "[".repeat(500) + &"]".repeat(500);
        assert!(parse(&doc).is_err());
    }
}
