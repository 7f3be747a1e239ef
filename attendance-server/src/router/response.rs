//! 响应适配: [`ApiResponse`] → 传输层响应
//!
//! 所有 JSON 响应带 `Content-Type: application/json; charset=utf-8` 与
//! `Access-Control-Allow-Origin: *`；预检响应为 204 无响应体。

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use shared::json::{self, JsonValue};

use crate::utils::AppError;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// 已序列化的 JSON；预检响应为 `None`
    pub body: Option<String>,
}

impl ApiResponse {
    /// 序列化失败时降级为 500
    pub fn json(status: StatusCode, value: &JsonValue) -> Self {
        match json::to_string(value) {
            Ok(body) => Self {
                status,
                body: Some(body),
            },
            Err(e) => Self::from_error(&AppError::from(e)),
        }
    }

    pub fn ok(value: &JsonValue) -> Self {
        Self::json(StatusCode::OK, value)
    }

    pub fn message(status: StatusCode, message: &str) -> Self {
        Self::json(status, &JsonValue::object([("message", message.into())]))
    }

    /// 错误 → `{message}`；5xx 的内部细节只写日志
    pub fn from_error(err: &AppError) -> Self {
        let status = err.status();
        if status.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        }
        Self::message(status, err.client_message())
    }

    pub fn preflight() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }

    /// 解析响应体 (测试用)
    pub fn json_body(&self) -> Option<JsonValue> {
        self.body.as_deref().and_then(|b| json::parse(b).ok())
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let is_preflight = self.body.is_none();
        let mut response = Response::new(match self.body {
            Some(body) => Body::from(body),
            None => Body::empty(),
        });
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        if is_preflight {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
            headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
        } else {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        response
    }
}
