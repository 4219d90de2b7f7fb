use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::shared::constants::{ROLE_AUTHORITY, ROLE_EMPLOYEE, ROLE_REQUESTER};

/// Application role carried in the access token.
///
/// The mobile clients historically wrote the Spanish names, so those are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "usuario", alias = "docente")]
    Requester,
    #[serde(alias = "empleado")]
    Employee,
    #[serde(alias = "autoridad")]
    Authority,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Requester => write!(f, "{}", ROLE_REQUESTER),
            Role::Employee => write!(f, "{}", ROLE_EMPLOYEE),
            Role::Authority => write!(f, "{}", ROLE_AUTHORITY),
        }
    }
}

/// The authenticated principal for the current request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Require the given role, returning the principal's id
    pub fn require_role(&self, role: Role) -> Result<Uuid> {
        if !self.has_role(role) {
            return Err(AppError::InvalidSession(format!(
                "{} session required, found {}",
                role, self.role
            )));
        }
        Ok(self.user_id)
    }

    /// Require the given role and that the principal is acting for itself
    pub fn require_self(&self, role: Role, subject_id: Uuid) -> Result<Uuid> {
        let id = self.require_role(role)?;
        if id != subject_id {
            return Err(AppError::InvalidSession(format!(
                "Session does not belong to {} {}",
                role, subject_id
            )));
        }
        Ok(id)
    }

    /// Name shown to other users when this principal acts on a report
    pub fn actor_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.user_id.to_string())
    }
}

/// Application claims set by the backend on the user's `app_metadata`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    pub role: Option<Role>,
    #[serde(default)]
    pub display_name: Option<String>,
}
