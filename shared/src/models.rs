//! Request and response payloads shared by the HTTP functions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::context::{ConversationContext, Turn};
use crate::roles::{Role, RoleAssignment};
use crate::sentiment::{ChatSentiment, JournalSentiment};

/// Chat message plus the conversation so far.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(alias = "text")]
    pub message: String,
    #[serde(default, rename = "previousMessages", alias = "previousTurns")]
    pub previous_messages: Vec<Turn>,
}

/// Assistant reply. `response` repeats `response_text` for older web clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response_text: String,
    pub response: String,
    pub sentiment: ChatSentiment,
    pub context: ConversationContext,
}

/// Journal entry to reflect on.
#[derive(Debug, Default, Deserialize)]
pub struct JournalRequest {
    #[serde(default, alias = "text")]
    pub content: String,
}

/// Suggestion for a journal entry. `suggestion` repeats `suggestion_text` for older web clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalResponse {
    pub suggestion_text: String,
    pub suggestion: String,
    pub sentiment: JournalSentiment,
}

/// Target of an admin grant. Both fields absent means the caller.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignAdminRequest {
    pub user_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl AssignAdminRequest {
    /// Blank fields count as absent.
    pub fn normalized(self) -> Self {
        let present = |field: Option<String>| {
            field
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            user_id: present(self.user_id),
            email: present(self.email),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignAdminResponse {
    pub success: bool,
    pub message: String,
    pub user_id: Uuid,
}

/// Body of `POST /v1/roles/{userId}`.
#[derive(Debug, Default, Deserialize)]
pub struct AssignRoleRequest {
    pub role: Option<Role>,
}

/// Capabilities of the calling user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerRolesResponse {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
    pub is_admin: bool,
    pub is_moderator: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRolesResponse {
    pub user_id: Uuid,
    pub assignments: Vec<RoleAssignment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeResponse {
    pub success: bool,
    pub user_id: Uuid,
    pub role: Role,
}
