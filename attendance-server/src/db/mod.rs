//! Database Module
//!
//! 存储层只暴露两个操作，核心业务不依赖具体引擎：
//!
//! - [`Store::execute`] - 执行语句，返回受影响行数
//! - [`Store::query`] - 执行查询，返回有序的 `列名 → 文本值` 行
//!
//! 每条语句相对自身效果原子完成；跨语句的一致性由上层
//! ([`crate::leave::EmployeeLocks`]) 负责。

pub mod repository;
pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

/// 存储层错误
#[derive(Debug, Error)]
pub enum DbError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("row decode error: {0}")]
    Decode(String),
}

/// 绑定参数 (按位置绑定到 `?`)
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

/// SQL 语句 + 位置参数
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }
}

/// 查询结果行: 按列顺序排列，NULL 表示为空字符串
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, String)>,
}

impl Row {
    pub fn new(columns: Vec<(String, String)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 必需的文本列
    pub fn text(&self, column: &str) -> Result<&str, DbError> {
        self.get(column)
            .ok_or_else(|| DbError::Decode(format!("missing column '{column}'")))
    }

    /// 必需的整数列 (SQLite 可能把整数求和结果表示为 `8.0`)
    pub fn int(&self, column: &str) -> Result<i64, DbError> {
        let raw = self.text(column)?;
        raw.parse::<i64>()
            .or_else(|_| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
                    .ok_or(())
            })
            .map_err(|_| DbError::Decode(format!("column '{column}' is not an integer: {raw:?}")))
    }
}

/// 存储协作者 - 必须自行保证并发调用安全
#[async_trait]
pub trait Store: Send + Sync {
    /// 执行写语句，返回受影响行数
    async fn execute(&self, statement: Statement) -> Result<u64, DbError>;

    /// 执行查询，返回全部行
    async fn query(&self, statement: Statement) -> Result<Vec<Row>, DbError>;

    /// 查询首行
    async fn query_one(&self, statement: Statement) -> Result<Option<Row>, DbError> {
        Ok(self.query(statement).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accessors() {
        let row = Row::new(vec![
            ("id".to_string(), "42".to_string()),
            ("total".to_string(), "8.0".to_string()),
            ("name".to_string(), "Zhang San".to_string()),
        ]);

        assert_eq!(row.int("id").unwrap(), 42);
        assert_eq!(row.int("total").unwrap(), 8);
        assert_eq!(row.text("name").unwrap(), "Zhang San");
        assert!(row.int("name").is_err());
        assert!(row.text("absent").is_err());
        assert_eq!(row.columns().map(|(k, _)| k).collect::<Vec<_>>(), vec!["id", "total", "name"]);
    }

    #[test]
    fn test_statement_bind_order() {
        let stmt = Statement::new("SELECT ? , ?").bind(1_i64).bind("x");
        assert_eq!(stmt.params, vec![SqlParam::Int(1), SqlParam::Text("x".to_string())]);
    }
}
