//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`logger`] - 日志初始化
//! - [`time`] - 日期时间解析
//! - [`validation`] - 输入校验

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::AppError;
pub use result::AppResult;
