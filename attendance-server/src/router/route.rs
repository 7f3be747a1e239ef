//! 路径模板与匹配
//!
//! 模板由 `/` 分隔的字面段与 `{name}` 占位段组成：
//!
//! - 段数必须完全相同 (末尾空段先去掉)
//! - 字面段区分大小写精确匹配
//! - 占位段匹配任意单个非空段，原样绑定为字符串

use http::Method;
use shared::models::Role;

/// 访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 无需令牌
    Public,
    /// 任意已登录角色
    Authenticated,
    /// 指定角色
    Role(Role),
}

impl Access {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Access::Public)
    }

    pub fn required_role(&self) -> Option<Role> {
        match self {
            Access::Role(role) => Some(*role),
            Access::Public | Access::Authenticated => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// 解析后的路径模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Self {
        let segments = split_path(template)
            .into_iter()
            .map(|segment| {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();
        Self {
            raw: template.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 匹配已拆分的请求路径，成功时返回绑定参数
    pub fn matches(&self, path: &[&str]) -> Option<PathParams> {
        if path.len() != self.segments.len() {
            return None;
        }
        let mut params = PathParams::default();
        for (segment, actual) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(literal) if literal == actual => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if actual.is_empty() => return None,
                Segment::Param(name) => params.push(name, actual),
            }
        }
        Some(params)
    }
}

/// 按 `/` 拆分路径并去掉末尾空段 (`/api/employees/` 与 `/api/employees` 等价)
pub fn split_path(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').collect();
    while segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}

/// 路径参数 (名称 → 原始字符串)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: Vec<(String, String)>,
}

impl PathParams {
    fn push(&mut self, name: &str, value: &str) {
        self.values.push((name.to_string(), value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// 路由表条目
#[derive(Debug, Clone)]
pub struct Route<E> {
    pub method: Method,
    pub template: PathTemplate,
    pub access: Access,
    pub endpoint: E,
}

impl<E> Route<E> {
    pub fn new(method: Method, template: &str, access: Access, endpoint: E) -> Self {
        Self {
            method,
            template: PathTemplate::parse(template),
            access,
            endpoint,
        }
    }
}
