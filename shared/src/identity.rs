//! User lookup by email.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::Result;

/// Resolves user ids from the identity store.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<Uuid>>;
}

/// Looks users up in the `users` table.
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<Uuid>> {
        let id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }
}

/// In-process directory for tests and local runs.
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<String, Uuid>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, email: impl Into<String>, user_id: Uuid) {
        self.users.write().await.insert(email.into(), user_id);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<Uuid>> {
        Ok(self.users.read().await.get(email).copied())
    }
}
