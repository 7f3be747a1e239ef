//! Attendance Server - 员工请假管理服务
//!
//! # 架构概述
//!
//! 单进程 HTTP JSON 服务，提供以下核心功能：
//!
//! - **路由** (`router`): 路由表、鉴权、请求/响应封装
//! - **认证** (`auth`): HMAC-SHA256 令牌 + PBKDF2 密码哈希
//! - **请假规则** (`leave`): 年假累计、病假月度配额、同员工串行化
//! - **数据库** (`db`): 嵌入式 SQLite 存储
//! - **HTTP API** (`api`): 员工、请假记录接口
//!
//! # 模块结构
//!
//! ```text
//! attendance-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── router/        # 路由表和分发
//! ├── auth/          # 令牌、密码、账户
//! ├── leave/         # 年假/病假规则
//! ├── api/           # HTTP 处理器
//! ├── utils/         # 错误、日志、时间、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod leave;
pub mod router;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, TokenService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 `.env` 并初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ___   __  __                 __
   /   | / /_/ /____  ____  ____/ /___ _____  ________
  / /| |/ __/ __/ _ \/ __ \/ __  / __ `/ __ \/ ___/ _ \
 / ___ / /_/ /_/  __/ / / / /_/ / /_/ / / / / /__/  __/
/_/  |_\__/\__/\___/_/ /_/\__,_/\__,_/_/ /_/\___/\___/
    "#
    );
}
