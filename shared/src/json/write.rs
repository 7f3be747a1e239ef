//! JSON 序列化 (紧凑格式，无缩进)

use std::fmt::Write as _;

use super::{JsonError, JsonValue};

pub(crate) fn write_value(out: &mut String, value: &JsonValue) -> Result<(), JsonError> {
    match value {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(true) => out.push_str("true"),
        JsonValue::Bool(false) => out.push_str("false"),
        JsonValue::Integer(n) => {
            let _ = write!(out, "{}", n);
        }
        JsonValue::Float(f) => write_float(out, *f)?,
        JsonValue::String(s) => write_string(out, s),
        JsonValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        JsonValue::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, item)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

/// 浮点数始终带小数点，保证重新解析后仍是浮点
fn write_float(out: &mut String, value: f64) -> Result<(), JsonError> {
    if !value.is_finite() {
        return Err(JsonError::UnsupportedType(format!("non-finite number {}", value)));
    }
    let start = out.len();
    let _ = write!(out, "{}", value);
    if !out[start..].contains(['.', 'e', 'E']) {
        out.push_str(".0");
    }
    Ok(())
}

/// 写入带引号并转义的字符串
pub(crate) fn write_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
