//! Caller identity from API Gateway authorizer claims or bearer tokens.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use lambda_http::{Request, RequestExt};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{Error, Result};

/// Claims carried by the backend's access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id)
    pub sub: String,
    /// Email
    #[serde(default)]
    pub email: Option<String>,
    /// Backend role of the session (e.g. "authenticated"), not an application role
    #[serde(default)]
    pub role: Option<String>,
    /// Expiration
    pub exp: i64,
}

/// Decoded user information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl TryFrom<AccessClaims> for AuthenticatedUser {
    type Error = Error;

    fn try_from(claims: AccessClaims) -> Result<Self> {
        Ok(Self {
            user_id: parse_subject(&claims.sub)?,
            email: claims.email,
        })
    }
}

fn parse_subject(sub: &str) -> Result<Uuid> {
    Uuid::parse_str(sub).map_err(|e| Error::Auth(format!("Invalid user id in token: {}", e)))
}

/// Verify an HS256 access token and extract the user.
pub fn validate_token(token: &str, secret: &str) -> Result<AuthenticatedUser> {
    let token = token.strip_prefix("Bearer ").unwrap_or(token);

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| Error::Auth(format!("Failed to decode token: {}", e)))?;

    AuthenticatedUser::try_from(token_data.claims)
}

/// Extract user from API Gateway authorizer claims.
pub fn extract_user_from_context(claims: &serde_json::Value) -> Result<AuthenticatedUser> {
    let sub = claims
        .get("sub")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Auth("Missing sub claim".to_string()))?;

    let email = claims.get("email").and_then(|v| v.as_str()).map(String::from);

    Ok(AuthenticatedUser {
        user_id: parse_subject(sub)?,
        email,
    })
}

/// Resolve the calling user, if any.
///
/// Authorizer claims take precedence. Otherwise a bearer token is verified when
/// `jwt_secret` is configured. Unverifiable credentials are logged and treated
/// as an anonymous caller.
pub fn caller_from_request(event: &Request, jwt_secret: Option<&str>) -> Option<AuthenticatedUser> {
    let claims = event
        .request_context_ref()
        .and_then(|context| context.authorizer())
        .and_then(|a| a.fields.get("claims"));

    if let Some(claims) = claims {
        return match extract_user_from_context(claims) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Ignoring authorizer claims: {}", e);
                None
            }
        };
    }

    let token = event
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())?;
    let secret = jwt_secret?;

    match validate_token(token, secret) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Rejected bearer token: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token_for(sub: &str, secret: &str) -> String {
        let claims = AccessClaims {
            sub: sub.to_string(),
            email: Some("sam@example.com".to_string()),
            role: Some("authenticated".to_string()),
            exp: chrono::Utc::now().timestamp() + 3600,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_validate_token() {
        let id = Uuid::new_v4();
        let token = format!("Bearer {}", token_for(&id.to_string(), SECRET));

        let user = validate_token(&token, SECRET).unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.email.as_deref(), Some("sam@example.com"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = token_for(&Uuid::new_v4().to_string(), SECRET);
        assert!(matches!(validate_token(&token, "other"), Err(Error::Auth(_))));
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let token = token_for("not-a-uuid", SECRET);
        assert!(matches!(validate_token(&token, SECRET), Err(Error::Auth(_))));
    }

    #[test]
    fn test_extract_user_from_context() {
        let id = Uuid::new_v4();
        let claims = serde_json::json!({ "sub": id.to_string(), "email": "kai@example.com" });

        let user = extract_user_from_context(&claims).unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.email.as_deref(), Some("kai@example.com"));

        assert!(extract_user_from_context(&serde_json::json!({})).is_err());
    }

    #[test]
    fn test_bearer_header_without_secret_is_anonymous() {
        let token = token_for(&Uuid::new_v4().to_string(), SECRET);
        let request = lambda_http::http::Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(lambda_http::Body::Empty)
            .unwrap();

        assert_eq!(caller_from_request(&request, None), None);
        assert!(caller_from_request(&request, Some(SECRET)).is_some());
    }
}
