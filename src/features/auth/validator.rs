use super::model::{AppMetadata, AuthenticatedUser};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // Standard JWT claims (validated by jsonwebtoken library)
    sub: String,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "aud")]
    _aud: AudienceClaim,
    #[serde(rename = "exp")]
    _exp: u64,

    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    app_metadata: Option<AppMetadata>,
}

/// Audience can be either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum AudienceClaim {
    Single(String),
    Multiple(Vec<String>),
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        session_from_claims(token_data.claims)
    }
}

fn session_from_claims(claims: Claims) -> Result<AuthenticatedUser, AppError> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Auth("Token subject is not a valid user id".to_string()))?;

    // A valid token without an application role is an account that was never provisioned
    let metadata = claims
        .app_metadata
        .ok_or_else(|| AppError::InvalidSession("Token carries no application role".to_string()))?;
    let role = metadata
        .role
        .ok_or_else(|| AppError::InvalidSession("Token carries no application role".to_string()))?;

    Ok(AuthenticatedUser {
        user_id,
        role,
        display_name: metadata.display_name,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;

    fn claims(json: serde_json::Value) -> Claims {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_session_from_claims() {
        let id = Uuid::new_v4();
        let session = session_from_claims(claims(serde_json::json!({
            "sub": id.to_string(),
            "iss": "https://auth.example.co/auth/v1",
            "aud": "authenticated",
            "exp": 4_000_000_000u64,
            "email": "ana@colegio.edu",
            "app_metadata": { "role": "empleado", "display_name": "Ana Ruiz" }
        })))
        .unwrap();

        assert_eq!(session.user_id, id);
        assert_eq!(session.role, Role::Employee);
        assert_eq!(session.display_name.as_deref(), Some("Ana Ruiz"));
        assert_eq!(session.email.as_deref(), Some("ana@colegio.edu"));
    }

    #[test]
    fn test_session_without_role_is_invalid() {
        let result = session_from_claims(claims(serde_json::json!({
            "sub": Uuid::new_v4().to_string(),
            "iss": "https://auth.example.co/auth/v1",
            "aud": ["authenticated"],
            "exp": 4_000_000_000u64,
            "app_metadata": {}
        })));
        assert!(matches!(result, Err(AppError::InvalidSession(_))));
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let result = session_from_claims(claims(serde_json::json!({
            "sub": "not-a-uuid",
            "iss": "https://auth.example.co/auth/v1",
            "aud": "authenticated",
            "exp": 4_000_000_000u64,
            "app_metadata": { "role": "requester" }
        })));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
