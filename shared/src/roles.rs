//! Role storage and the access checks built on it.
//!
//! Roles live in the `user_roles` table as `(user_id, role)` pairs with a
//! uniqueness constraint, so granting twice leaves a single row and a single
//! revoke removes the role completely.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{Error, Result};

/// Permission level a user may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(Error::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// A stored grant of `role` to `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub user_id: Uuid,
    pub role: Role,
    pub granted_at: DateTime<Utc>,
}

/// Outcome of an idempotent grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Created,
    AlreadyHeld,
}

/// What a set of roles permits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub roles: BTreeSet<Role>,
    pub is_admin: bool,
    pub is_moderator: bool,
}

impl Capabilities {
    pub fn from_roles(roles: BTreeSet<Role>) -> Self {
        let is_admin = roles.contains(&Role::Admin);
        Self {
            is_moderator: is_admin || roles.contains(&Role::Moderator),
            is_admin,
            roles,
        }
    }
}

/// Multi-valued store of role assignments keyed by user id.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Roles held by `user_id`; an unknown user holds none.
    async fn roles_for(&self, user_id: Uuid) -> Result<BTreeSet<Role>>;

    async fn assignments_for(&self, user_id: Uuid) -> Result<Vec<RoleAssignment>>;

    /// Returns `true` when a new assignment was stored.
    async fn insert(&self, user_id: Uuid, role: Role) -> Result<bool>;

    /// Returns `true` when an assignment existed and was removed.
    async fn delete(&self, user_id: Uuid, role: Role) -> Result<bool>;
}

/// Postgres-backed role store.
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn roles_for(&self, user_id: Uuid) -> Result<BTreeSet<Role>> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .iter()
            .filter_map(|raw| match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(_) => {
                    warn!("Ignoring unknown role '{}' for user {}", raw, user_id);
                    None
                }
            })
            .collect())
    }

    async fn assignments_for(&self, user_id: Uuid) -> Result<Vec<RoleAssignment>> {
        let rows: Vec<(String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT role, granted_at FROM user_roles WHERE user_id = $1 ORDER BY granted_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(raw, granted_at)| {
                raw.parse().ok().map(|role| RoleAssignment {
                    user_id,
                    role,
                    granted_at,
                })
            })
            .collect())
    }

    async fn insert(&self, user_id: Uuid, role: Role) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: Uuid, role: Role) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role = $2")
            .bind(user_id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-process role store for tests and local runs.
#[derive(Default)]
pub struct MemoryRoleStore {
    assignments: RwLock<HashMap<Uuid, BTreeMap<Role, DateTime<Utc>>>>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn roles_for(&self, user_id: Uuid) -> Result<BTreeSet<Role>> {
        Ok(self
            .assignments
            .read()
            .await
            .get(&user_id)
            .map(|roles| roles.keys().copied().collect())
            .unwrap_or_default())
    }

    async fn assignments_for(&self, user_id: Uuid) -> Result<Vec<RoleAssignment>> {
        let assignments = self.assignments.read().await;
        let mut found: Vec<RoleAssignment> = assignments
            .get(&user_id)
            .into_iter()
            .flatten()
            .map(|(role, granted_at)| RoleAssignment {
                user_id,
                role: *role,
                granted_at: *granted_at,
            })
            .collect();
        found.sort_by_key(|a| a.granted_at);
        Ok(found)
    }

    async fn insert(&self, user_id: Uuid, role: Role) -> Result<bool> {
        let mut assignments = self.assignments.write().await;
        let roles = assignments.entry(user_id).or_default();
        if roles.contains_key(&role) {
            return Ok(false);
        }
        roles.insert(role, Utc::now());
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, role: Role) -> Result<bool> {
        let mut assignments = self.assignments.write().await;
        Ok(assignments
            .get_mut(&user_id)
            .map(|roles| roles.remove(&role).is_some())
            .unwrap_or(false))
    }
}

/// Turns stored role assignments into allow/deny decisions.
#[derive(Clone)]
pub struct RoleGate {
    store: Arc<dyn RoleStore>,
    timeout: Option<Duration>,
}

impl RoleGate {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every store round trip by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T>(&self, operation: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| Error::Timeout(format!("{} exceeded {:?}", operation, limit)))?,
            None => call.await,
        }
    }

    /// Roles held by `user_id`. Store failures are returned to the caller.
    pub async fn fetch_roles(&self, user_id: Uuid) -> Result<BTreeSet<Role>> {
        self.bounded("fetch roles", self.store.roles_for(user_id)).await
    }

    pub async fn assignments(&self, user_id: Uuid) -> Result<Vec<RoleAssignment>> {
        self.bounded("list assignments", self.store.assignments_for(user_id))
            .await
    }

    /// Lenient lookup: a missing id or a failed fetch yields no roles.
    pub async fn check_user_roles(&self, user_id: Option<Uuid>) -> BTreeSet<Role> {
        let Some(user_id) = user_id else {
            return BTreeSet::new();
        };

        match self.fetch_roles(user_id).await {
            Ok(roles) => roles,
            Err(e) => {
                error!("Error checking roles for user {}: {}", user_id, e);
                BTreeSet::new()
            }
        }
    }

    /// Roles and derived capabilities from a single lenient fetch.
    pub async fn capabilities(&self, user_id: Uuid) -> Capabilities {
        Capabilities::from_roles(self.check_user_roles(Some(user_id)).await)
    }

    pub async fn is_admin(&self, user_id: Uuid) -> bool {
        self.capabilities(user_id).await.is_admin
    }

    /// Admins always have moderator capability.
    pub async fn is_moderator(&self, user_id: Uuid) -> bool {
        self.capabilities(user_id).await.is_moderator
    }

    /// Grant `role`, reporting whether it was newly created.
    pub async fn grant(&self, user_id: Uuid, role: Role) -> Result<Grant> {
        let created = self
            .bounded("assign role", self.store.insert(user_id, role))
            .await?;

        if created {
            info!("Assigned role {} to user {}", role, user_id);
            Ok(Grant::Created)
        } else {
            Ok(Grant::AlreadyHeld)
        }
    }

    pub async fn assign_role(&self, user_id: Uuid, role: Role) -> bool {
        match self.grant(user_id, role).await {
            Ok(_) => true,
            Err(e) => {
                error!("Error assigning role {} to user {}: {}", role, user_id, e);
                false
            }
        }
    }

    /// Removing an assignment that does not exist still succeeds.
    pub async fn remove_role(&self, user_id: Uuid, role: Role) -> bool {
        match self
            .bounded("remove role", self.store.delete(user_id, role))
            .await
        {
            Ok(removed) => {
                if removed {
                    info!("Removed role {} from user {}", role, user_id);
                }
                true
            }
            Err(e) => {
                error!("Error removing role {} from user {}: {}", role, user_id, e);
                false
            }
        }
    }

    /// Fails with [`Error::Unauthorized`] unless `caller` holds the admin role.
    pub async fn require_admin(&self, caller: Uuid) -> Result<()> {
        if self.is_admin(caller).await {
            Ok(())
        } else {
            Err(Error::Unauthorized("Admin role required".to_string()))
        }
    }
}

/// Call-site guard: an admin may not revoke their own admin role.
pub fn ensure_can_revoke(caller: Uuid, target: Uuid, role: Role) -> Result<()> {
    if caller == target && role == Role::Admin {
        return Err(Error::Unauthorized(
            "You cannot remove your own admin role".to_string(),
        ));
    }
    Ok(())
}
