//! 集成测试公共设施: 内存数据库 + 临时密钥目录，请求直接走完整应用

#![allow(dead_code)]

use std::sync::Arc;

use attendance_server::core::{Config, ServerState, oneshot};
use attendance_server::db::SqliteStore;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use shared::json::{self, JsonValue};
use shared::models::Role;
use tempfile::TempDir;

pub struct TestApp {
    pub state: ServerState,
    // 保持临时目录存活
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> JsonValue {
        json::parse(&self.text).unwrap_or_else(|e| panic!("invalid JSON {:?}: {}", self.text, e))
    }

    pub fn message(&self) -> String {
        self.json()
            .get("message")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_data_dir(dir.path());
        let store = SqliteStore::in_memory().await.unwrap();
        let state = ServerState::with_store(&config, Arc::new(store)).await.unwrap();
        Self { state, _dir: dir }
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = oneshot(self.state.clone(), request).await;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            text: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        let body = format!(r#"{{"username":"{username}","password":"{password}"}}"#);
        self.send(Method::POST, "/api/auth/login", None, Some(&body)).await
    }

    pub async fn admin_token(&self) -> String {
        let response = self.login("admin", "admin123").await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        response.json().get("token").and_then(JsonValue::as_str).unwrap().to_string()
    }

    pub async fn staff_token(&self) -> String {
        self.state.accounts.register("clerk", "clerk-pass", Role::Staff).await.unwrap();
        let response = self.login("clerk", "clerk-pass").await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        response.json().get("token").and_then(JsonValue::as_str).unwrap().to_string()
    }

    /// 创建员工，返回 id
    pub async fn create_employee(&self, token: &str, chinese: &str, english: &str, hire_date: &str) -> i64 {
        let body = format!(r#"{{"chineseName":"{chinese}","englishName":"{english}","hireDate":"{hire_date}"}}"#);
        let response = self.send(Method::POST, "/api/employees", Some(token), Some(&body)).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        response.json().get("id").and_then(JsonValue::as_i64).unwrap()
    }

    pub async fn create_leave(
        &self,
        token: &str,
        english: &str,
        leave_type: &str,
        start: &str,
        end: &str,
        hours: i64,
    ) -> TestResponse {
        let body = format!(
            r#"{{"englishName":"{english}","type":"{leave_type}","startTime":"{start}","endTime":"{end}","hours":{hours}}}"#
        );
        self.send(Method::POST, "/api/leave-requests", Some(token), Some(&body)).await
    }
}
