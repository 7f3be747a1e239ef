//! API 模块
//!
//! # 结构
//!
//! - [`auth`] - 登录
//! - [`employees`] - 员工管理与年假汇总
//! - [`leave_requests`] - 请假记录
//!
//! 路由表在 [`routes`] 中按固定顺序注册，[`handle`] 以穷尽匹配把
//! [`Endpoint`] 分派到具体处理函数。

pub mod auth;
pub mod employees;
pub mod leave_requests;
pub mod params;

use shared::json::JsonValue;

use crate::core::ServerState;
use crate::router::{RequestContext, Router};
use crate::utils::AppResult;

/// 所有已注册的接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    ListEmployees,
    CreateEmployee,
    UpdateEmployee,
    DeleteEmployee,
    AnnualLeave,
    CreateLeaveRequest,
    SearchLeaveRequests,
    DeleteLeaveRequest,
}

/// 完整路由表
pub fn routes() -> Router<Endpoint> {
    let router = Router::new();
    let router = auth::register(router);
    let router = employees::register(router);
    leave_requests::register(router)
}

/// 调用接口处理函数
pub async fn handle(state: &ServerState, endpoint: Endpoint, ctx: RequestContext) -> AppResult<JsonValue> {
    match endpoint {
        Endpoint::Login => auth::login(state, ctx).await,
        Endpoint::ListEmployees => employees::list(state, ctx).await,
        Endpoint::CreateEmployee => employees::create(state, ctx).await,
        Endpoint::UpdateEmployee => employees::update(state, ctx).await,
        Endpoint::DeleteEmployee => employees::delete(state, ctx).await,
        Endpoint::AnnualLeave => employees::annual_leave(state, ctx).await,
        Endpoint::CreateLeaveRequest => leave_requests::create(state, ctx).await,
        Endpoint::SearchLeaveRequests => leave_requests::search(state, ctx).await,
        Endpoint::DeleteLeaveRequest => leave_requests::delete(state, ctx).await,
    }
}
