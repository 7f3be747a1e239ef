//! 登录、鉴权与路由层行为

mod common;

use chrono::Duration;
use common::TestApp;
use http::{Method, StatusCode, header};
use shared::json::JsonValue;
use shared::models::Role;

#[tokio::test]
async fn test_admin_login_returns_token_and_role() {
    let app = TestApp::new().await;
    let response = app.login("admin", "admin123").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body.get("role").and_then(JsonValue::as_str), Some("ADMIN"));
    let token = body.get("token").and_then(JsonValue::as_str).unwrap();
    assert_eq!(token.split('.').count(), 3);

    let user = app.state.tokens.verify(token).unwrap();
    assert_eq!(user.username, "admin");
    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn test_login_rejections_share_one_message() {
    let app = TestApp::new().await;

    let wrong_password = app.login("admin", "nope").await;
    assert_eq!(wrong_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password.message(), "Invalid credentials");

    let unknown_user = app.login("ghost", "admin123").await;
    assert_eq!(unknown_user.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.message(), "Invalid credentials");

    let empty = app.send(Method::POST, "/api/auth/login", None, Some("{}")).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.message(), "Invalid credentials");

    let malformed = app.send(Method::POST, "/api/auth/login", None, Some("{not json")).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.message(), "Invalid JSON body");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let missing = app.send(Method::GET, "/api/employees", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let garbage = app.send(Method::GET, "/api/employees", Some("abc.def.ghi"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let expired = app
        .state
        .tokens
        .issue("admin", Role::Admin, Duration::seconds(-1))
        .unwrap();
    let response = app.send(Method::GET, "/api/employees", Some(&expired), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_staff_cannot_manage_employees() {
    let app = TestApp::new().await;
    let staff = app.staff_token().await;

    let list = app.send(Method::GET, "/api/employees", Some(&staff), None).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.json(), JsonValue::Array(vec![]));

    let body = r#"{"chineseName":"张三","englishName":"Zhang San","hireDate":"2023-01-01"}"#;
    let create = app.send(Method::POST, "/api/employees", Some(&staff), Some(body)).await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);

    let delete = app.send(Method::DELETE, "/api/leave-requests/1", Some(&staff), None).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_route_and_preflight() {
    let app = TestApp::new().await;

    let missing = app.send(Method::GET, "/api/nowhere", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.message(), "Not found");

    let wrong_method = app.send(Method::PATCH, "/api/employees", None, None).await;
    assert_eq!(wrong_method.status, StatusCode::NOT_FOUND);

    let preflight = app.send(Method::OPTIONS, "/api/employees", None, None).await;
    assert_eq!(preflight.status, StatusCode::NO_CONTENT);
    assert_eq!(
        preflight.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert!(preflight.headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    assert!(preflight.text.is_empty());
}

#[tokio::test]
async fn test_every_response_carries_cors_and_request_id() {
    let app = TestApp::new().await;
    let response = app.login("admin", "admin123").await;

    assert_eq!(response.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert!(
        response.headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/json")
    );
    assert!(response.headers.contains_key("x-request-id"));
}
