//! 请假业务规则
//!
//! - [`accrual`] - 年假累计 (纯函数)
//! - [`quota`] - 插入前额度校验
//! - [`EmployeeLocks`] - 同员工请求串行化

pub mod accrual;
pub mod locks;
pub mod quota;

pub use accrual::{AnnualLeaveBalance, HOURS_PER_DAY, LeaveYear};
pub use locks::EmployeeLocks;
