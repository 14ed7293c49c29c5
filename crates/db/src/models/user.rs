//! Back-office accounts and roles.

use serde::{Deserialize, Serialize};
use vidu_core::types::{DbId, Timestamp};
use vidu_core::users::UserStatus;

#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role_id: String,
    /// Extra permissions granted on top of the role.
    pub permissions: Vec<String>,
    pub status: UserStatus,
    pub last_login: Option<Timestamp>,
    /// Argon2 PHC string. Accounts without one cannot log in.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

/// DTO for creating an account. The password hash is computed by the caller.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub role_id: String,
    pub password_hash: Option<String>,
}

/// DTO for updating an account. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Role {
    /// Role code, e.g. `ADMIN` or `ROLE_12`.
    pub id: String,
    pub name: String,
    pub permissions: Vec<String>,
}
