use std::path::{Path, PathBuf};

use chrono::Duration;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | ../data | 数据目录 (数据库 + 令牌密钥) |
/// | DATABASE_FILE | attendance.db | 数据库文件名 |
/// | SECRET_KEY_FILE | backend-secret.key | 令牌密钥文件名 |
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | TOKEN_VALIDITY_HOURS | 8 | 令牌有效期 (小时) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 设置后按天滚动写入日志文件 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/var/lib/attendance HTTP_PORT=9000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 数据目录
    pub data_dir: PathBuf,
    pub database_file: String,
    pub secret_key_file: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    pub token_validity_hours: i64,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 运行环境: development | production
    pub environment: String,
    /// 请求体上限 (字节)
    pub max_body_bytes: usize,
}

const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            data_dir: PathBuf::from(env_or("DATA_DIR", "../data")),
            database_file: env_or("DATABASE_FILE", "attendance.db"),
            secret_key_file: env_or("SECRET_KEY_FILE", "backend-secret.key"),
            http_port: env_parse("HTTP_PORT", 8080),
            token_validity_hours: env_parse("TOKEN_VALIDITY_HOURS", 8_i64).max(1),
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.trim().is_empty()),
            environment: env_or("ENVIRONMENT", "development"),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// 指定数据目录，其余取默认值 (不读环境变量)
    ///
    /// 常用于测试场景
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            database_file: "attendance.db".into(),
            secret_key_file: "backend-secret.key".into(),
            http_port: 8080,
            token_validity_hours: 8,
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn secret_key_path(&self) -> PathBuf {
        self.data_dir.join(&self.secret_key_file)
    }

    pub fn token_validity(&self) -> Duration {
        Duration::hours(self.token_validity_hours)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
