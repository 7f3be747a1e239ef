//! Leave Request API Module

mod handler;

use http::Method;
use shared::models::Role;

use super::Endpoint;
use crate::router::{Access, Router};

pub use handler::{create, delete, search};

pub fn register(router: Router<Endpoint>) -> Router<Endpoint> {
    router
        .route(Method::POST, "/api/leave-requests", Access::Authenticated, Endpoint::CreateLeaveRequest)
        .route(Method::GET, "/api/leave-requests", Access::Authenticated, Endpoint::SearchLeaveRequests)
        .route(
            Method::DELETE,
            "/api/leave-requests/{id}",
            Access::Role(Role::Admin),
            Endpoint::DeleteLeaveRequest,
        )
}
