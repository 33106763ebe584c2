use std::sync::Arc;

use chrono::Utc;

use crate::crypto::PasswordManager;
use crate::error::{Result, ServerError};
use crate::user::{RegisterRequest, User, UserResponse, UserStore};

/// User account manager.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    pwd: Arc<PasswordManager>,
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(store: Arc<dyn UserStore>, pwd: Arc<PasswordManager>) -> Self {
        Self { store, pwd }
    }

    /// Register a new account.
    ///
    /// The password is stored as an Argon2id PHC string and the returned
    /// projection never carries it.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse> {
        tracing::debug!(username = %request.username, "registering user");

        // Early rejection, same pattern as student creation. The unique
        // index on `username` stays authoritative.
        if self
            .store
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(ServerError::Duplicate {
                resource: "user",
                field: "username",
                value: request.username,
            });
        }

        let password = self.pwd.hash_password(&request.password)?;

        let now = Utc::now();
        let user = User {
            id: String::default(),
            username: request.username,
            password,
            email: request.email,
            full_name: request.full_name,
            role: request.role,
            active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        };

        let user = self.store.insert(user).await?;
        Ok(UserResponse::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::repository::memory::MemoryUserStore;

    fn request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: "hunter2hunter2".into(),
            email: Some("grace@x.com".into()),
            full_name: "Grace Hopper".into(),
            role: "ADMIN".into(),
        }
    }

    fn service(store: Arc<MemoryUserStore>) -> UserService {
        UserService::new(store, Arc::new(PasswordManager::new(None).unwrap()))
    }

    #[tokio::test]
    async fn test_register_stamps_lifecycle_and_hashes() {
        let store = Arc::new(MemoryUserStore::default());
        let service = service(Arc::clone(&store));

        let response = service.register(request("grace")).await.unwrap();

        assert!(!response.id.is_empty());
        assert!(response.active);
        assert_eq!(response.last_login, None);

        let stored = store.find_by_username("grace").await.unwrap().unwrap();
        assert_ne!(stored.password, "hunter2hunter2");
        assert!(stored.password.starts_with("$argon2id$"));
        assert_eq!(stored.created_at, stored.updated_at);

        let pwd = PasswordManager::new(None).unwrap();
        assert!(pwd.verify_password("hunter2hunter2", &stored.password).is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_username_rejected() {
        let store = Arc::new(MemoryUserStore::default());
        let service = service(store);

        service.register(request("grace")).await.unwrap();
        let err = service.register(request("grace")).await.unwrap_err();

        assert!(matches!(err, ServerError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_response_serialization_has_no_password() {
        let store = Arc::new(MemoryUserStore::default());
        let service = service(store);

        let response = service.register(request("grace")).await.unwrap();
        let value = serde_json::to_value(&response).unwrap();

        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "grace");
        assert_eq!(value["fullName"], "Grace Hopper");
    }
}
