//! Auth API Module

mod handler;

use http::Method;

use super::Endpoint;
use crate::router::{Access, Router};

pub use handler::login;

pub fn register(router: Router<Endpoint>) -> Router<Endpoint> {
    router.route(Method::POST, "/api/auth/login", Access::Public, Endpoint::Login)
}
