//! 请求适配: 传输层请求 → [`ApiRequest`]

use http::{HeaderMap, Method};
use shared::json::{self, JsonMap};

use super::route::PathParams;
use crate::auth::CurrentUser;
use crate::utils::{AppError, AppResult};

/// 与传输层无关的请求
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// URL 解码后的查询参数，保持出现顺序
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiRequest {
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (target, Vec::new()),
        };
        Self {
            method,
            path: path.to_string(),
            query,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
    }
}

/// 查询串解码 (`+` 与 `%XX`)
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// 处理函数的调用上下文
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub params: PathParams,
    pub query: Vec<(String, String)>,
    pub body: String,
    /// 公开路由为 `None`
    pub user: Option<CurrentUser>,
}

impl RequestContext {
    pub fn param(&self, name: &str) -> AppResult<&str> {
        self.params
            .get(name)
            .ok_or_else(|| AppError::internal(format!("route has no '{name}' parameter")))
    }

    /// 路径中的数字 id
    pub fn id_param(&self, name: &str) -> AppResult<i64> {
        self.param(name)?
            .parse::<i64>()
            .map_err(|_| AppError::validation("Invalid id"))
    }

    /// 首个同名查询参数；空值视为未提供
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// 请求体 JSON 对象；空请求体视为 `{}`
    pub fn json_body(&self) -> AppResult<JsonMap> {
        if self.body.trim().is_empty() {
            return Ok(JsonMap::new());
        }
        json::parse_object(&self.body).map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            AppError::validation("Invalid JSON body")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_split_and_query_decode() {
        let req = ApiRequest::new(
            Method::GET,
            "/api/leave-requests?englishName=Zhang+San&type=sick&start=2026-05-01T00%3A00&size=",
        );
        assert_eq!(req.path, "/api/leave-requests");
        assert_eq!(
            req.query,
            vec![
                ("englishName".to_string(), "Zhang San".to_string()),
                ("type".to_string(), "sick".to_string()),
                ("start".to_string(), "2026-05-01T00:00".to_string()),
                ("size".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_context_helpers() {
        let ctx = RequestContext {
            params: PathParams::default(),
            query: parse_query("page=2&size=&page=9"),
            body: "  ".to_string(),
            user: None,
        };
        assert_eq!(ctx.query_param("page"), Some("2"));
        assert_eq!(ctx.query_param("size"), None);
        assert!(ctx.json_body().unwrap().is_empty());
        assert!(matches!(ctx.id_param("id"), Err(AppError::Internal(_))));

        let bad = RequestContext {
            body: "[1,2]".to_string(),
            ..ctx.clone()
        };
        assert!(matches!(bad.json_body(), Err(AppError::Validation(_))));
    }
}
