// src/utils/password.rs

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// パスワード関連のエラー
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Password verification failed")]
    VerificationFailed,

    #[error("Weak password: {0}")]
    WeakPassword(String),
}

/// パスワード強度要件
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// 最小文字数
    pub min_length: usize,
    /// 最大文字数
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

impl PasswordPolicy {
    pub fn validate(&self, password: &str) -> Result<(), PasswordError> {
        let len = password.chars().count();
        if len < self.min_length {
            return Err(PasswordError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }
        if len > self.max_length {
            return Err(PasswordError::WeakPassword(format!(
                "Password must be at most {} characters",
                self.max_length
            )));
        }
        Ok(())
    }
}

/// パスワードのハッシュ化と検証
pub struct PasswordManager {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
}

impl Default for PasswordManager {
    fn default() -> Self {
        Self::new(PasswordPolicy::default())
    }
}

impl PasswordManager {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self {
            argon2: Argon2::default(),
            policy,
        }
    }

    /// ポリシーを検証してからハッシュ化
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.policy.validate(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingError(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// 保存済みハッシュとの照合
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<(), PasswordError> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|_| PasswordError::VerificationFailed)?;
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| PasswordError::VerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let manager = PasswordManager::default();
        let hash = manager.hash_password("Secur3-Passw0rd").unwrap();

        assert!(manager.verify_password("Secur3-Passw0rd", &hash).is_ok());
        assert!(manager.verify_password("wrong-password", &hash).is_err());
    }

    #[test]
    fn test_policy_rejects_short_password() {
        let manager = PasswordManager::default();
        match manager.hash_password("short") {
            Err(PasswordError::WeakPassword(_)) => {}
            other => panic!("expected WeakPassword, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_hashes_are_salted() {
        let manager = PasswordManager::default();
        let h1 = manager.hash_password("Secur3-Passw0rd").unwrap();
        let h2 = manager.hash_password("Secur3-Passw0rd").unwrap();
        assert_ne!(h1, h2);
    }
}
