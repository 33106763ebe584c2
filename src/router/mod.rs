//! HTTP surface: input validation and handler dispatch.

pub mod status;
pub mod students;
pub mod users;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::ServerError;

/// Extractor running the declarative validation contract before any
/// service is invoked: parse JSON, validate fields, or reject with a
/// field-level error list.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Required-string fields must not be blank.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// MUST NEVER be used in production.
#[cfg(test)]
pub(crate) fn state() -> crate::AppState {
    use std::sync::Arc;

    use crate::student::repository::memory::MemoryStudentStore;
    use crate::user::repository::memory::MemoryUserStore;
    use crate::{config, crypto, student, user};

    let pwd = Arc::new(crypto::PasswordManager::new(None).expect("argon2 params"));

    crate::AppState {
        config: Arc::new(config::Configuration::default()),
        students: student::StudentService::new(Arc::new(MemoryStudentStore::default())),
        users: user::UserService::new(Arc::new(MemoryUserStore::default()), pwd),
    }
}
