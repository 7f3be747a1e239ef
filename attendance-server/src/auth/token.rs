//! 令牌服务
//!
//! 令牌格式: `base64url(header).base64url(payload).base64url(signature)`
//!
//! - header: `{"alg":"HS256","typ":"JWT"}`
//! - payload: `{"sub":..,"role":..,"exp":<epoch seconds>}`
//! - signature: HMAC-SHA256(`header.payload`)，密钥进程内只加载一次
//!
//! 无服务端吊销列表，令牌只能通过过期失效。

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use ring::hmac;
use ring::rand::{SecureRandom, SystemRandom};
use shared::json::{self, JsonValue};
use shared::models::Role;
use thiserror::Error;

/// 新生成的密钥长度 (256-bit)
const SECRET_LEN: usize = 32;

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// 令牌错误
#[derive(Error, Debug, PartialEq)]
pub enum TokenError {
    #[error("无效令牌: {0}")]
    Malformed(String),

    #[error("令牌已过期")]
    Expired,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("密钥错误: {0}")]
    SecretKey(String),
}

/// 已验证的调用者
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// 读取密钥文件；不存在时生成随机密钥并写入
pub fn load_or_create_secret(path: &Path) -> Result<Vec<u8>, TokenError> {
    if path.exists() {
        let secret = std::fs::read(path)
            .map_err(|e| TokenError::SecretKey(format!("failed to read {}: {e}", path.display())))?;
        if secret.is_empty() {
            return Err(TokenError::SecretKey(format!("{} is empty", path.display())));
        }
        tracing::info!(path = %path.display(), "Token secret loaded");
        return Ok(secret);
    }

    let mut secret = vec![0u8; SECRET_LEN];
    SystemRandom::new()
        .fill(&mut secret)
        .map_err(|_| TokenError::SecretKey("Failed to generate secure random key".to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| TokenError::SecretKey(format!("failed to create {}: {e}", parent.display())))?;
    }
    std::fs::write(path, &secret)
        .map_err(|e| TokenError::SecretKey(format!("failed to write {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "Token secret generated");
    Ok(secret)
}

/// 令牌签发与验证
pub struct TokenService {
    key: hmac::Key,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret),
        }
    }

    /// 从密钥文件构建 (见 [`load_or_create_secret`])
    pub fn load(path: &Path) -> Result<Self, TokenError> {
        Ok(Self::new(&load_or_create_secret(path)?))
    }

    /// 签发令牌，有效期从当前时间起算
    pub fn issue(&self, subject: &str, role: Role, validity: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, role, validity, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        validity: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let exp = (now + validity).timestamp();
        let payload = JsonValue::object([
            ("sub", subject.into()),
            ("role", role.as_str().into()),
            ("exp", exp.into()),
        ]);
        let payload_json = json::to_string(&payload).map_err(|e| TokenError::GenerationFailed(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER_JSON),
            URL_SAFE_NO_PAD.encode(payload_json)
        );
        let signature = hmac::sign(&self.key, signing_input.as_bytes());
        Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature.as_ref())))
    }

    /// 验证令牌并返回调用者
    pub fn verify(&self, token: &str) -> Result<CurrentUser, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<CurrentUser, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [header, payload, signature] = parts[..] else {
            return Err(TokenError::Malformed(format!("expected 3 segments, found {}", parts.len())));
        };

        // ring::hmac::verify 为常量时间比较
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::InvalidSignature)?;
        let signing_input = &token[..header.len() + 1 + payload.len()];
        hmac::verify(&self.key, signing_input.as_bytes(), &signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| TokenError::Malformed(format!("payload encoding: {e}")))?;
        let payload = String::from_utf8(payload)
            .map_err(|_| TokenError::Malformed("payload is not UTF-8".to_string()))?;
        let claims = json::parse_object(&payload).map_err(|e| TokenError::Malformed(e.to_string()))?;

        let subject = claims
            .get("sub")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| TokenError::Malformed("missing sub".to_string()))?;
        let role = claims
            .get("role")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| TokenError::Malformed("missing role".to_string()))?;
        let exp = match claims.get("exp") {
            Some(JsonValue::Integer(n)) => *n,
            Some(JsonValue::String(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| TokenError::Malformed(format!("malformed exp {s:?}")))?,
            Some(other) => return Err(TokenError::Malformed(format!("exp must be a number, found {}", other.kind()))),
            None => return Err(TokenError::Malformed("missing exp".to_string())),
        };

        if now.timestamp() >= exp {
            return Err(TokenError::Expired);
        }

        let role = role
            .parse::<Role>()
            .map_err(|e| TokenError::Malformed(e.to_string()))?;
        Ok(CurrentUser {
            username: subject.to_string(),
            role,
        })
    }

    /// 从 Authorization 头提取令牌 (仅接受 `Bearer ` 前缀)
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"0123456789abcdef0123456789abcdef")
    }

    fn sign_raw(service: &TokenService, payload_json: &str) -> String {
        let input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER_JSON),
            URL_SAFE_NO_PAD.encode(payload_json)
        );
        let sig = hmac::sign(&service.key, input.as_bytes());
        format!("{input}.{}", URL_SAFE_NO_PAD.encode(sig.as_ref()))
    }

    #[test]
    fn test_issue_then_verify() {
        let service = service();
        let token = service.issue("admin", Role::Admin, Duration::hours(8)).unwrap();

        let user = service.verify(&token).unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(token.split('.').count(), 3);
        assert!(!token.contains('='));
    }

    #[test]
    fn test_expiry_boundary() {
        let service = service();
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let token = service
            .issue_at("alice", Role::Staff, Duration::hours(8), issued)
            .unwrap();

        let just_before = issued + Duration::hours(8) - Duration::seconds(1);
        let at_expiry = issued + Duration::hours(8);
        assert!(service.verify_at(&token, just_before).is_ok());
        assert_eq!(service.verify_at(&token, at_expiry), Err(TokenError::Expired));
    }

    #[test]
    fn test_any_altered_character_is_rejected() {
        let service = service();
        let token = service.issue("alice", Role::Staff, Duration::hours(8)).unwrap();

        for (i, c) in token.char_indices() {
            let replacement = if c == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(i..i + c.len_utf8(), &replacement.to_string());
            assert!(service.verify(&tampered).is_err(), "tampered at {i} accepted");
        }
    }

    #[test]
    fn test_segment_count() {
        let service = service();
        let token = service.issue("alice", Role::Staff, Duration::hours(8)).unwrap();

        assert!(matches!(service.verify("a.b"), Err(TokenError::Malformed(_))));
        assert!(matches!(service.verify(&format!("{token}.extra")), Err(TokenError::Malformed(_))));
        assert!(matches!(service.verify(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_other_key_rejected() {
        let token = service().issue("alice", Role::Staff, Duration::hours(8)).unwrap();
        let other = TokenService::new(b"another-secret-another-secret-xx");
        assert_eq!(other.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_payload_claims() {
        let service = service();
        let future = Utc::now().timestamp() + 3600;

        let string_exp = sign_raw(&service, &format!(r#"{{"sub":"bob","role":"STAFF","exp":"{future}"}}"#));
        assert_eq!(service.verify(&string_exp).unwrap().username, "bob");

        let missing_role = sign_raw(&service, &format!(r#"{{"sub":"bob","exp":{future}}}"#));
        assert!(matches!(service.verify(&missing_role), Err(TokenError::Malformed(_))));

        let bad_exp = sign_raw(&service, r#"{"sub":"bob","role":"STAFF","exp":"soon"}"#);
        assert!(matches!(service.verify(&bad_exp), Err(TokenError::Malformed(_))));

        let unknown_role = sign_raw(&service, &format!(r#"{{"sub":"bob","role":"ROOT","exp":{future}}}"#));
        assert!(matches!(service.verify(&unknown_role), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(TokenService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(TokenService::extract_from_header("bearer abc"), None);
        assert_eq!(TokenService::extract_from_header("Bearer "), None);
        assert_eq!(TokenService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_secret_file_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("backend-secret.key");

        let first = load_or_create_secret(&path).unwrap();
        assert_eq!(first.len(), SECRET_LEN);
        let second = load_or_create_secret(&path).unwrap();
        assert_eq!(first, second);

        let token = TokenService::new(&first).issue("alice", Role::Staff, Duration::hours(1)).unwrap();
        assert!(TokenService::load(&path).unwrap().verify(&token).is_ok());
    }
}
