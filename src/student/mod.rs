pub(crate) mod repository;
mod service;

pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Student as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub department: String,
    pub year: i32,
    pub gpa: Option<f64>,
    #[sqlx(json)]
    pub courses: Vec<Course>,
    pub status: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Course followed by a [`Student`]. Lives and dies with its owner.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: String,
    pub course_name: String,
    pub course_code: String,
    pub credits: String,
    pub grade: String,
}

/// Inbound student record, shared by the create and update paths.
///
/// `courses` absent on update means the stored courses stay untouched.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    #[validate(custom(
        function = "crate::router::not_blank",
        message = "First name is required."
    ))]
    pub first_name: String,
    #[validate(custom(
        function = "crate::router::not_blank",
        message = "Last name is required."
    ))]
    pub last_name: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(custom(
        function = "crate::router::not_blank",
        message = "Phone number is required."
    ))]
    pub phone_number: String,
    #[validate(custom(
        function = "crate::router::not_blank",
        message = "Address is required."
    ))]
    pub address: String,
    #[validate(custom(
        function = "crate::router::not_blank",
        message = "Department is required."
    ))]
    pub department: String,
    pub year: i32,
    pub gpa: Option<f64>,
    pub courses: Option<Vec<Course>>,
    pub status: Option<String>,
}
