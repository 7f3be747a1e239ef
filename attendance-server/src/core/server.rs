//! Server Implementation
//!
//! axum 只负责监听与 HTTP 报文收发，所有请求交给同一个 fallback
//! 处理函数，由 [`crate::router::dispatch`] 完成路由与鉴权。

use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use http::{HeaderName, HeaderValue};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::{Config, ServerState};
use crate::router::{self, ApiRequest, ApiResponse};
use crate::utils::AppError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// 传输层入口: 读取请求体后交给路由分发
async fn handle_request(State(state): State<ServerState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let bytes = match axum::body::to_bytes(body, state.config.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            return ApiResponse::from_error(&AppError::validation("Request body too large")).into_response();
        }
    };
    let body = match String::from_utf8(bytes.to_vec()) {
        Ok(body) => body,
        Err(_) => {
            return ApiResponse::from_error(&AppError::validation("Request body must be UTF-8")).into_response();
        }
    };

    let api_request = ApiRequest::new(parts.method, &target)
        .with_headers(parts.headers)
        .with_body(body);
    router::dispatch(&state, api_request).await.into_response()
}

/// 构建完整应用 (HTTP 服务与 oneshot 测试共用)
pub fn app(state: ServerState) -> axum::Router {
    axum::Router::new()
        .fallback(handle_request)
        .with_state(state)
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
}

/// 单个请求直接走完整应用 (不经过网络)
pub async fn oneshot(state: ServerState, request: http::Request<Body>) -> Response {
    use tower::ServiceExt;

    match app(state).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config, state: None }
    }

    /// Create server with existing state (for sharing with oneshot)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Attendance server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app(state))
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
