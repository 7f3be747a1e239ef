//! 口令哈希 (PBKDF2-HMAC-SHA256)
//!
//! 16 字节随机盐，12000 次迭代，256-bit 摘要，摘要与盐均以 base64 存储。

use std::num::NonZeroU32;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

const ITERATIONS: NonZeroU32 = match NonZeroU32::new(12_000) {
    Some(n) => n,
    None => panic!("iteration count must be non-zero"),
};
const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to generate salt")]
    Salt,
}

/// 已存储的口令摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword {
    pub hash: String,
    pub salt: String,
}

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    rng: SystemRandom,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    pub fn hash(&self, plaintext: &str) -> Result<HashedPassword, PasswordError> {
        let mut salt = [0u8; SALT_LEN];
        self.rng.fill(&mut salt).map_err(|_| PasswordError::Salt)?;

        let mut digest = [0u8; DIGEST_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            ITERATIONS,
            &salt,
            plaintext.as_bytes(),
            &mut digest,
        );
        Ok(HashedPassword {
            hash: STANDARD.encode(digest),
            salt: STANDARD.encode(salt),
        })
    }

    /// 常量时间比较；摘要长度不符或编码损坏视为不匹配
    pub fn verify(&self, plaintext: &str, stored: &HashedPassword) -> bool {
        let (Ok(expected), Ok(salt)) = (STANDARD.decode(&stored.hash), STANDARD.decode(&stored.salt)) else {
            return false;
        };
        if expected.len() != DIGEST_LEN {
            return false;
        }
        pbkdf2::verify(
            pbkdf2::PBKDF2_HMAC_SHA256,
            ITERATIONS,
            &salt,
            plaintext.as_bytes(),
            &expected,
        )
        .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let stored = hasher.hash("admin123").unwrap();

        assert!(hasher.verify("admin123", &stored));
        assert!(!hasher.verify("admin124", &stored));
        assert!(!hasher.verify("", &stored));
        assert_eq!(STANDARD.decode(&stored.salt).unwrap().len(), SALT_LEN);
        assert_eq!(STANDARD.decode(&stored.hash).unwrap().len(), DIGEST_LEN);
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_corrupt_or_truncated_digest() {
        let hasher = PasswordHasher::new();
        let stored = hasher.hash("secret").unwrap();

        let truncated = HashedPassword {
            hash: STANDARD.encode(&STANDARD.decode(&stored.hash).unwrap()[..16]),
            salt: stored.salt.clone(),
        };
        assert!(!hasher.verify("secret", &truncated));

        let garbage = HashedPassword {
            hash: "not base64!".to_string(),
            salt: stored.salt,
        };
        assert!(!hasher.verify("secret", &garbage));
    }
}
