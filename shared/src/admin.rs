//! Admin role assignment flow.
//!
//! Target resolution order:
//! 1. `email`, looked up in the user directory (404 when unknown)
//! 2. `userId`
//! 3. the authenticated caller (401 when anonymous)

use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::http::ErrorBody;
use crate::identity::UserDirectory;
use crate::models::{AssignAdminRequest, AssignAdminResponse};
use crate::roles::{Grant, Role, RoleGate};
use crate::{Error, Result};

async fn resolve_target(
    directory: &dyn UserDirectory,
    caller: Option<&AuthenticatedUser>,
    request: &AssignAdminRequest,
) -> Result<Uuid> {
    if let Some(email) = request.email.as_deref() {
        return directory
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No user found with email {}", email)));
    }

    if let Some(user_id) = request.user_id.as_deref() {
        return Uuid::parse_str(user_id)
            .map_err(|e| Error::Validation(format!("Invalid userId '{}': {}", user_id, e)));
    }

    caller
        .map(|user| user.user_id)
        .ok_or_else(|| Error::Auth("User not authenticated".to_string()))
}

/// Grant the admin role to the resolved target. Granting twice is harmless.
pub async fn assign_admin_role(
    gate: &RoleGate,
    directory: &dyn UserDirectory,
    caller: Option<&AuthenticatedUser>,
    request: AssignAdminRequest,
) -> Result<AssignAdminResponse> {
    let request = request.normalized();
    request.validate()?;

    let target = resolve_target(directory, caller, &request).await?;

    let message = match gate.grant(target, Role::Admin).await? {
        Grant::Created => "Admin role assigned successfully",
        Grant::AlreadyHeld => "User already has admin role",
    };

    info!(
        "Admin grant for {} requested by {:?}: {}",
        target,
        caller.map(|c| c.user_id),
        message
    );

    Ok(AssignAdminResponse {
        success: true,
        message: message.to_string(),
        user_id: target,
    })
}

/// Status and body for a failed assignment.
///
/// Anything other than an unknown email or a missing identity is reported as 400.
pub fn failure_response(error: &Error) -> (u16, ErrorBody) {
    match error {
        Error::NotFound(message) => (404, ErrorBody::new("User not found").with_message(message.clone())),
        Error::Auth(message) => (401, ErrorBody::new("Unauthorized").with_message(message.clone())),
        other => {
            error!("Error assigning admin role: {}", other);
            (400, ErrorBody::new(other.to_string()))
        }
    }
}
