//! 路由分发
//!
//! 请求处理顺序:
//!
//! 1. `OPTIONS` → 204 预检响应 (不做路由匹配)
//! 2. 按注册顺序匹配 (method, 路径模板)，首个命中者胜；无命中 → 404
//! 3. 需要认证而令牌缺失/无效 → 401 (处理函数不会执行)
//! 4. 角色不符 → 403
//! 5. 调用处理函数；[`crate::utils::AppError`] 在此统一映射为状态码

pub mod request;
pub mod response;
pub mod route;

pub use request::{ApiRequest, RequestContext};
pub use response::ApiResponse;
pub use route::{Access, PathParams, PathTemplate, Route};

use http::{Method, StatusCode};

use crate::api;
use crate::auth::guard;
use crate::core::ServerState;
use crate::utils::AppResult;

/// 路由表
#[derive(Debug, Clone)]
pub struct Router<E> {
    routes: Vec<Route<E>>,
}

impl<E> Default for Router<E> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<E> Router<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册路由；重叠模板按注册顺序决定优先级
    pub fn route(mut self, method: Method, template: &str, access: Access, endpoint: E) -> Self {
        self.routes.push(Route::new(method, template, access, endpoint));
        self
    }

    pub fn routes(&self) -> &[Route<E>] {
        &self.routes
    }

    /// 查找首个匹配的路由
    pub fn resolve(&self, method: &Method, path: &str) -> Option<(&Route<E>, PathParams)> {
        let segments = route::split_path(path);
        self.routes
            .iter()
            .filter(|r| r.method == *method)
            .find_map(|r| r.template.matches(&segments).map(|params| (r, params)))
    }
}

/// 处理一个请求，任何错误都转为响应
pub async fn dispatch(state: &ServerState, request: ApiRequest) -> ApiResponse {
    if request.method == Method::OPTIONS {
        return ApiResponse::preflight();
    }

    let Some((route, params)) = state.router.resolve(&request.method, &request.path) else {
        tracing::debug!(method = %request.method, path = %request.path, "No route matched");
        return ApiResponse::message(StatusCode::NOT_FOUND, "Not found");
    };

    let endpoint = route.endpoint;
    match authorize(state, route.access, &request) {
        Ok(user) => {
            let ctx = RequestContext {
                params,
                query: request.query,
                body: request.body,
                user,
            };
            match api::handle(state, endpoint, ctx).await {
                Ok(value) => ApiResponse::ok(&value),
                Err(err) => {
                    if !err.status().is_server_error() {
                        tracing::debug!(endpoint = ?endpoint, error = %err, "Request rejected");
                    }
                    ApiResponse::from_error(&err)
                }
            }
        }
        Err(err) => ApiResponse::from_error(&err),
    }
}

fn authorize(
    state: &ServerState,
    access: Access,
    request: &ApiRequest,
) -> AppResult<Option<crate::auth::CurrentUser>> {
    if !access.requires_auth() {
        return Ok(None);
    }
    let user = guard::authenticate(&state.tokens, request.authorization(), &request.path)?;
    if let Some(role) = access.required_role() {
        guard::require_role(&user, role, &request.path)?;
    }
    Ok(Some(user))
}
