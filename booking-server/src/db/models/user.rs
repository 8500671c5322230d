//! User Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::Role;
use surrealdb::RecordId;
use validator::Validate;

/// User ID type
pub type UserId = RecordId;

/// User entity (用户)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Argon2 password hash，永不序列化给客户端
    pub hash_pass: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = User::hash_password("correct horse battery").unwrap();
        let user = User {
            id: None,
            username: "alice".into(),
            email: "alice@example.com".into(),
            role: Role::Customer,
            hash_pass: hash,
            phone_number: None,
            created_at: Utc::now(),
        };
        assert!(user.verify_password("correct horse battery").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[test]
    fn registration_payload_validation() {
        let payload = UserCreate {
            username: "bob".into(),
            email: "not-an-email".into(),
            password: "hunter2hunter2".into(),
            role: None,
            phone_number: None,
        };
        assert!(payload.validate().is_err());
    }
}
