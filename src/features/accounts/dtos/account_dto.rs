use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::Role;
use crate::features::reports::models::Department;

/// Request DTO for creating an employee account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeDto {
    #[validate(custom(
        function = "crate::shared::validation::validate_not_blank",
        message = "Name is required"
    ))]
    pub name: String,

    #[validate(custom(
        function = "crate::shared::validation::validate_not_blank",
        message = "Last name is required"
    ))]
    pub last_name: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Phone must have 7 to 15 digits, optionally starting with +"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub department: Department,

    #[validate(custom(
        function = "crate::shared::validation::validate_not_blank",
        message = "Title is required"
    ))]
    pub title: String,
}

/// Request DTO for creating a requester account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequesterDto {
    #[validate(custom(
        function = "crate::shared::validation::validate_not_blank",
        message = "Name is required"
    ))]
    pub name: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Response DTO for a provisioned account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponseDto {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    /// Whether the identity provider sent the verification notice
    pub verification_sent: bool,
}

/// Query parameters for listing employees
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct EmployeeQueryParams {
    /// `mantenimiento` or `sistemas`
    pub department: Option<Department>,
}
