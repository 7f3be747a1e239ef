//! Employee API Module

mod handler;

use http::Method;
use shared::models::Role;

use super::Endpoint;
use crate::router::{Access, Router};

pub use handler::{annual_leave, create, delete, list, update};

pub fn register(router: Router<Endpoint>) -> Router<Endpoint> {
    router
        // 读取: 任意已登录角色
        .route(Method::GET, "/api/employees", Access::Authenticated, Endpoint::ListEmployees)
        .route(
            Method::GET,
            "/api/employees/{id}/annual-leave",
            Access::Authenticated,
            Endpoint::AnnualLeave,
        )
        // 管理: 仅管理员
        .route(Method::POST, "/api/employees", Access::Role(Role::Admin), Endpoint::CreateEmployee)
        .route(Method::PUT, "/api/employees/{id}", Access::Role(Role::Admin), Endpoint::UpdateEmployee)
        .route(Method::DELETE, "/api/employees/{id}", Access::Role(Role::Admin), Endpoint::DeleteEmployee)
}
