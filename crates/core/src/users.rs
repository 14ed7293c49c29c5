//! Back-office account rules: status, credential defaults, and field validation.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;

/// Password given to every account created from the back office.
pub const DEFAULT_PASSWORD: &str = "123456";

pub const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Username must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(CoreError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !email.trim().to_string().validate_email() {
        return Err(CoreError::Validation(format!("Invalid email address '{email}'")));
    }
    Ok(())
}

/// Identifier of the `n`-th custom role.
pub fn custom_role_id(n: i64) -> String {
    format!("ROLE_{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings() {
        assert_eq!(UserStatus::Active.to_string(), "ACTIVE");
        assert_eq!(
            serde_json::to_string(&UserStatus::Inactive).unwrap(),
            "\"INACTIVE\""
        );
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("Editor01").is_ok());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"x".repeat(65)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("editor@vidustudio.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn role_id_format() {
        assert_eq!(custom_role_id(4), "ROLE_4");
    }
}
