//! Handle database requests for the `users` collection.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::database::generate_id;
use crate::error::Result;
use crate::user::User;

/// Storage adapter for [`User`] records.
///
/// The unique index on `username` is the authoritative uniqueness guarantee.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new record and return it with its store-assigned id.
    async fn insert(&self, user: User) -> Result<User>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new [`PgUserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn insert(&self, mut user: User) -> Result<User> {
        user.id = generate_id();

        sqlx::query(
            r#"INSERT INTO users (id, username, password, email, full_name, role,
                active, created_at, updated_at, last_login)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.role)
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.last_login)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, password, email, full_name, role,
                active, created_at, updated_at, last_login
                FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory [`UserStore`] backing the test suite.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[derive(Default)]
    pub(crate) struct MemoryUserStore {
        rows: Mutex<Vec<User>>,
        next_id: AtomicU64,
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn insert(&self, mut user: User) -> Result<User> {
            let n = self.next_id.fetch_add(1, Ordering::Relaxed);
            user.id = format!("{n:024x}");
            self.rows.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }
    }
}
