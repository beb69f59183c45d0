//! Request routing for the role management endpoints.
//!
//! Checks run in a fixed order: caller identity (401), target id (400),
//! admin capability (403), then the route itself (404 when unknown).

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::models::{AssignRoleRequest, CallerRolesResponse, RoleChangeResponse, UserRolesResponse};
use crate::roles::{ensure_can_revoke, Role, RoleGate};
use crate::{Error, Result};

pub const ROLES_PREFIX: &str = "/v1/roles/";

/// Successful outcome of a roles request.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RoleReply {
    Caller(CallerRolesResponse),
    Assignments(UserRolesResponse),
    Changed(RoleChangeResponse),
}

impl RoleReply {
    /// A store failure during assign or remove is reported as 500.
    pub fn status(&self) -> u16 {
        match self {
            RoleReply::Changed(change) if !change.success => 500,
            _ => 200,
        }
    }
}

fn role_change(success: bool, user_id: Uuid, role: Role) -> RoleReply {
    RoleReply::Changed(RoleChangeResponse {
        success,
        user_id,
        role,
    })
}

fn parse_assign_body(body: &[u8]) -> Result<AssignRoleRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AssignRoleRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| Error::Validation(format!("Invalid request body: {}", e)))
}

/// Serve one roles request on behalf of `caller`.
pub async fn handle(
    gate: &RoleGate,
    caller: Option<Uuid>,
    method: &str,
    path: &str,
    body: &[u8],
) -> Result<RoleReply> {
    let caller = caller.ok_or_else(|| Error::Auth("Authentication required".to_string()))?;

    if (method, path) == ("GET", "/v1/roles/me") {
        let capabilities = gate.capabilities(caller).await;
        return Ok(RoleReply::Caller(CallerRolesResponse {
            user_id: caller,
            is_admin: capabilities.is_admin,
            is_moderator: capabilities.is_moderator,
            roles: capabilities.roles.into_iter().collect(),
        }));
    }

    let not_found = || Error::NotFound(format!("{} {}", method, path));

    let rest = path.strip_prefix(ROLES_PREFIX).ok_or_else(not_found)?;
    let path_parts: Vec<&str> = rest.split('/').collect();

    let target = Uuid::parse_str(path_parts[0])
        .map_err(|_| Error::Validation("Invalid user ID".to_string()))?;

    if let Err(e) = gate.require_admin(caller).await {
        warn!("User {} denied role management: {}", caller, e);
        return Err(e);
    }

    match (method, path_parts.as_slice()) {
        ("GET", [_]) => Ok(RoleReply::Assignments(UserRolesResponse {
            user_id: target,
            assignments: gate.assignments(target).await?,
        })),

        ("POST", [_]) => {
            let role = parse_assign_body(body)?
                .role
                .ok_or_else(|| Error::Validation("Missing role".to_string()))?;

            Ok(role_change(gate.assign_role(target, role).await, target, role))
        }

        ("DELETE", [_, role]) => {
            let role: Role = role.parse()?;
            ensure_can_revoke(caller, target, role)?;

            Ok(role_change(gate.remove_role(target, role).await, target, role))
        }

        _ => Err(not_found()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{MemoryRoleStore, RoleAssignment, RoleStore};
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    async fn gate_with_admin() -> (RoleGate, Uuid) {
        let gate = RoleGate::new(Arc::new(MemoryRoleStore::new()));
        let admin = Uuid::new_v4();
        gate.assign_role(admin, Role::Admin).await;
        (gate, admin)
    }

    fn user_path(user: Uuid) -> String {
        format!("{}{}", ROLES_PREFIX, user)
    }

    #[tokio::test]
    async fn test_missing_caller_is_401() {
        let (gate, _) = gate_with_admin().await;
        for (method, path) in [("GET", "/v1/roles/me".to_string()), ("GET", user_path(Uuid::new_v4()))] {
            let err = handle(&gate, None, method, &path, b"").await.unwrap_err();
            assert_eq!(err.status_code(), 401, "{} {}", method, path);
        }
    }

    #[tokio::test]
    async fn test_me_reports_capabilities() {
        let (gate, admin) = gate_with_admin().await;

        let reply = handle(&gate, Some(admin), "GET", "/v1/roles/me", b"").await.unwrap();
        assert_eq!(reply.status(), 200);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["userId"], admin.to_string());
        assert_eq!(json["roles"], serde_json::json!(["admin"]));
        assert_eq!(json["isAdmin"], true);
        assert_eq!(json["isModerator"], true);

        let nobody = Uuid::new_v4();
        let reply = handle(&gate, Some(nobody), "GET", "/v1/roles/me", b"").await.unwrap();
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["roles"], serde_json::json!([]));
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["isModerator"], false);
    }

    #[tokio::test]
    async fn test_non_admin_is_403() {
        let (gate, _) = gate_with_admin().await;
        let moderator = Uuid::new_v4();
        gate.assign_role(moderator, Role::Moderator).await;
        let target = Uuid::new_v4();

        for (method, path, body) in [
            ("GET", user_path(target), ""),
            ("POST", user_path(target), r#"{"role":"moderator"}"#),
            ("DELETE", format!("{}/moderator", user_path(target)), ""),
        ] {
            let err = handle(&gate, Some(moderator), method, &path, body.as_bytes())
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), 403, "{} {}", method, path);
        }
        assert!(gate.assignments(target).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_assigns_lists_and_removes() {
        let (gate, admin) = gate_with_admin().await;
        let target = Uuid::new_v4();
        let path = user_path(target);

        let assigned = handle(&gate, Some(admin), "POST", &path, br#"{"role":"moderator"}"#)
            .await
            .unwrap();
        assert_eq!(assigned.status(), 200);
        assert!(gate.is_moderator(target).await);

        let listed = handle(&gate, Some(admin), "GET", &path, b"").await.unwrap();
        let json = serde_json::to_value(&listed).unwrap();
        assert_eq!(json["assignments"][0]["role"], "moderator");

        let removed = handle(&gate, Some(admin), "DELETE", &format!("{}/moderator", path), b"")
            .await
            .unwrap();
        let json = serde_json::to_value(&removed).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["role"], "moderator");
        assert!(!gate.is_moderator(target).await);
    }

    #[tokio::test]
    async fn test_admin_cannot_remove_own_admin_role() {
        let (gate, admin) = gate_with_admin().await;

        let err = handle(&gate, Some(admin), "DELETE", &format!("{}/admin", user_path(admin)), b"")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(gate.is_admin(admin).await);

        // Other roles of their own remain removable.
        gate.assign_role(admin, Role::Moderator).await;
        let reply = handle(&gate, Some(admin), "DELETE", &format!("{}/moderator", user_path(admin)), b"")
            .await
            .unwrap();
        assert_eq!(reply.status(), 200);
    }

    #[tokio::test]
    async fn test_malformed_requests() {
        let (gate, admin) = gate_with_admin().await;
        let target = Uuid::new_v4();
        let path = user_path(target);

        let cases = [
            ("GET", "/v1/roles/not-a-uuid".to_string(), "", 400),
            ("GET", "/v1/roles/".to_string(), "", 400),
            ("GET", "/v1/other".to_string(), "", 404),
            ("PUT", path.clone(), "", 404),
            ("GET", format!("{}/admin/extra", path), "", 404),
            ("DELETE", path.clone(), "", 404),
            ("DELETE", format!("{}/superuser", path), "", 400),
            ("POST", path.clone(), "", 400),
            ("POST", path.clone(), "{}", 400),
            ("POST", path.clone(), "{not json", 400),
            ("POST", path.clone(), r#"{"role":"superuser"}"#, 400),
        ];

        for (method, path, body, status) in cases {
            let err = handle(&gate, Some(admin), method, &path, body.as_bytes())
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), status, "{} {} {}", method, path, body);
        }
        assert!(gate.assignments(target).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_target_checked_before_admin() {
        let gate = RoleGate::new(Arc::new(MemoryRoleStore::new()));
        let err = handle(&gate, Some(Uuid::new_v4()), "GET", "/v1/roles/nope", b"")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    /// Reads succeed so the caller is an admin; writes fail.
    struct ReadOnlyStore(Uuid);

    #[async_trait]
    impl RoleStore for ReadOnlyStore {
        async fn roles_for(&self, user_id: Uuid) -> Result<BTreeSet<Role>> {
            Ok(if user_id == self.0 {
                BTreeSet::from([Role::Admin])
            } else {
                BTreeSet::new()
            })
        }
        async fn assignments_for(&self, _: Uuid) -> Result<Vec<RoleAssignment>> {
            Ok(Vec::new())
        }
        async fn insert(&self, _: Uuid, _: Role) -> Result<bool> {
            Err(Error::Database(sqlx::Error::PoolClosed))
        }
        async fn delete(&self, _: Uuid, _: Role) -> Result<bool> {
            Err(Error::Database(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn test_failed_write_is_500() {
        let admin = Uuid::new_v4();
        let gate = RoleGate::new(Arc::new(ReadOnlyStore(admin)));

        let reply = handle(&gate, Some(admin), "POST", &user_path(Uuid::new_v4()), br#"{"role":"user"}"#)
            .await
            .unwrap();
        assert_eq!(reply.status(), 500);
        assert_eq!(serde_json::to_value(&reply).unwrap()["success"], false);
    }
}
