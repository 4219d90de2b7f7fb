use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::model::{AuthenticatedUser, Role};

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseDto {
    pub user_id: Uuid,
    pub role: Role,
    /// Name shown on reports and notifications
    pub display_name: String,
    pub email: Option<String>,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            display_name: user.actor_name(),
            user_id: user.user_id,
            role: user.role,
            email: user.email,
        }
    }
}
