//! JSON 文本解析器
//!
//! 递归下降，按字节位置推进。错误位置为字节偏移。

use super::{JsonError, JsonMap, JsonValue};

/// 嵌套深度上限，防止恶意输入导致栈溢出
const MAX_DEPTH: usize = 128;

pub(crate) struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            position: 0,
            depth: 0,
        }
    }

    /// 解析完整文档：单个值，前后允许空白，之后不得有其他内容
    pub(crate) fn parse_document(mut self) -> Result<JsonValue, JsonError> {
        self.skip_whitespace();
        let value = self.parse_value()?;
        self.skip_whitespace();
        if let Some(c) = self.peek() {
            return Err(self.error(format!("trailing content starting with '{}'", c as char)));
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<JsonValue, JsonError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.unexpected_end()),
            Some(b'"') => self.parse_string().map(JsonValue::String),
            Some(b'{') => self.nested(Self::parse_object),
            Some(b'[') => self.nested(Self::parse_array),
            Some(b't') => self.parse_keyword("true", JsonValue::Bool(true)),
            Some(b'f') => self.parse_keyword("false", JsonValue::Bool(false)),
            Some(b'n') => self.parse_keyword("null", JsonValue::Null),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c as char))),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<JsonValue, JsonError>,
    ) -> Result<JsonValue, JsonError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("maximum nesting depth exceeded"));
        }
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_object(&mut self) -> Result<JsonValue, JsonError> {
        self.expect(b'{')?;
        let mut map = JsonMap::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.position += 1;
            return Ok(JsonValue::Object(map));
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.expected("string key"));
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.next_byte()? {
                b',' => continue,
                b'}' => break,
                c => return Err(self.error_at(self.position - 1, format!("expected ',' or '}}' but found '{}'", c as char))),
            }
        }
        Ok(JsonValue::Object(map))
    }

    fn parse_array(&mut self) -> Result<JsonValue, JsonError> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.position += 1;
            return Ok(JsonValue::Array(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.next_byte()? {
                b',' => continue,
                b']' => break,
                c => return Err(self.error_at(self.position - 1, format!("expected ',' or ']' but found '{}'", c as char))),
            }
        }
        Ok(JsonValue::Array(items))
    }

    fn parse_keyword(&mut self, keyword: &str, value: JsonValue) -> Result<JsonValue, JsonError> {
        if self.source[self.position..].starts_with(keyword) {
            self.position += keyword.len();
            Ok(value)
        } else {
            Err(self.expected(keyword))
        }
    }

    fn parse_number(&mut self) -> Result<JsonValue, JsonError> {
        let start = self.position;
        let mut is_float = false;

        if self.peek() == Some(b'-') {
            self.position += 1;
        }
        if self.consume_digits() == 0 {
            return Err(self.expected("digit"));
        }
        if self.peek() == Some(b'.') {
            is_float = true;
            self.position += 1;
            if self.consume_digits() == 0 {
                return Err(self.expected("digit after decimal point"));
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.position += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.position += 1;
            }
            if self.consume_digits() == 0 {
                return Err(self.expected("digit in exponent"));
            }
        }

        let literal = &self.source[start..self.position];
        if is_float {
            // 结果必须有限
            literal
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(JsonValue::Float)
                .ok_or_else(|| self.error_at(start, format!("number out of range '{}'", literal)))
        } else {
            literal
                .parse::<i64>()
                .map(JsonValue::Integer)
                .map_err(|_| self.error_at(start, format!("integer out of range '{}'", literal)))
        }
    }

    fn consume_digits(&mut self) -> usize {
        let start = self.position;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.position += 1;
        }
        self.position - start
    }

    fn parse_string(&mut self) -> Result<String, JsonError> {
        let opening = self.position;
        self.expect(b'"')?;
        let mut out = String::new();
        loop {
            // 复制到下一个引号或反斜杠之前的整段 UTF-8 文本
            let run_start = self.position;
            while let Some(c) = self.peek() {
                if c == b'"' || c == b'\\' {
                    break;
                }
                self.position += 1;
            }
            out.push_str(&self.source[run_start..self.position]);

            match self.peek() {
                None => return Err(self.error_at(opening, "unterminated string")),
                Some(b'"') => {
                    self.position += 1;
                    return Ok(out);
                }
                Some(_) => {
                    self.position += 1;
                    self.parse_escape(&mut out)?;
                }
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), JsonError> {
        let escape_at = self.position - 1;
        let Some(c) = self.peek() else {
            return Err(self.error_at(escape_at, "unterminated string"));
        };
        self.position += 1;
        match c {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let ch = self.parse_unicode_escape(escape_at)?;
                out.push(ch);
            }
            other => {
                return Err(self.error_at(
                    escape_at,
                    format!("invalid escape sequence '\\{}'", other as char),
                ));
            }
        }
        Ok(())
    }

    fn parse_unicode_escape(&mut self, escape_at: usize) -> Result<char, JsonError> {
        let high = self.read_hex4(escape_at)?;
        let code = match high {
            0xD800..=0xDBFF => {
                // 高代理项必须紧跟 \uDC00-\uDFFF
                if !self.source[self.position..].starts_with("\\u") {
                    return Err(self.error_at(escape_at, "unpaired surrogate in unicode escape"));
                }
                self.position += 2;
                let low = self.read_hex4(escape_at)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.error_at(escape_at, "invalid low surrogate in unicode escape"));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(self.error_at(escape_at, "unpaired surrogate in unicode escape"));
            }
            _ => high,
        };
        char::from_u32(code).ok_or_else(|| self.error_at(escape_at, "invalid unicode escape"))
    }

    fn read_hex4(&mut self, escape_at: usize) -> Result<u32, JsonError> {
        let end = self.position + 4;
        let hex = self
            .source
            .get(self.position..end)
            .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error_at(escape_at, "invalid unicode escape"))?;
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| self.error_at(escape_at, "invalid unicode escape"))?;
        self.position = end;
        Ok(code)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.position += 1;
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), JsonError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.position += 1;
                Ok(())
            }
            Some(_) => Err(self.expected(&format!("'{}'", expected as char))),
            None => Err(self.unexpected_end()),
        }
    }

    fn next_byte(&mut self) -> Result<u8, JsonError> {
        let c = self.peek().ok_or_else(|| self.unexpected_end())?;
        self.position += 1;
        Ok(c)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn expected(&self, what: &str) -> JsonError {
        match self.peek() {
            None => self.unexpected_end(),
            Some(c) => self.error(format!("expected {} but found '{}'", what, c as char)),
        }
    }

    fn unexpected_end(&self) -> JsonError {
        self.error("unexpected end of input")
    }

    fn error(&self, message: impl Into<String>) -> JsonError {
        self.error_at(self.position, message)
    }

    fn error_at(&self, position: usize, message: impl Into<String>) -> JsonError {
        JsonError::Parse {
            position,
            message: message.into(),
        }
    }
}
