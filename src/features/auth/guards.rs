//! Role-based authorization guards for the application.
//!
//! Roles are disjoint: a principal is exactly one of requester, employee or authority,
//! and no role includes the permissions of another.

use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, Role};
use axum::{extract::FromRequestParts, http::request::Parts};

fn session_with_role(parts: &Parts, role: Role) -> Result<AuthenticatedUser, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    user.require_role(role)?;
    Ok(user.clone())
}

/// Guard for requester (report filer) endpoints.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireRequester(user): RequireRequester) { ... }
/// ```
pub struct RequireRequester(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireRequester
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_with_role(parts, Role::Requester).map(RequireRequester)
    }
}

/// Guard for maintenance employee endpoints.
pub struct RequireEmployee(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireEmployee
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_with_role(parts, Role::Employee).map(RequireEmployee)
    }
}

/// Guard for authority endpoints (account provisioning, reassignment).
pub struct RequireAuthority(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAuthority
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_with_role(parts, Role::Authority).map(RequireAuthority)
    }
}
