pub(crate) mod repository;
mod service;

pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// User as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2id PHC string, never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    pub email: Option<String>,
    pub full_name: String,
    pub role: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

/// Registration request body.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(
        function = "crate::router::not_blank",
        message = "Username is required."
    ))]
    pub username: String,
    #[validate(custom(
        function = "crate::router::not_blank",
        message = "Password is required."
    ))]
    pub password: String,
    #[validate(email(message = "Email should be valid."))]
    pub email: Option<String>,
    #[validate(custom(
        function = "crate::router::not_blank",
        message = "Full name is required."
    ))]
    pub full_name: String,
    #[validate(custom(
        function = "crate::router::not_blank",
        message = "Role is required."
    ))]
    pub role: String,
}

/// Outbound projection of a [`User`]. Carries no password field at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub full_name: String,
    pub role: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}
