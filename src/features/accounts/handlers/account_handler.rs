use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::accounts::dtos::{
    AccountResponseDto, CreateEmployeeDto, CreateRequesterDto, EmployeeQueryParams,
};
use crate::features::accounts::services::AccountService;
use crate::features::auth::guards::RequireAuthority;
use crate::features::reports::models::Employee;
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// State for account handlers
#[derive(Clone)]
pub struct AccountState {
    pub account_service: Arc<AccountService>,
    pub report_service: Arc<ReportService>,
}

/// List employees, optionally filtered by department
#[utoipa::path(
    get,
    path = "/api/accounts/employees",
    params(EmployeeQueryParams),
    responses(
        (status = 200, description = "Employees", body = ApiResponse<Vec<Employee>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Authority session required")
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn list_employees(
    RequireAuthority(user): RequireAuthority,
    State(state): State<AccountState>,
    AppQuery(params): AppQuery<EmployeeQueryParams>,
) -> Result<Json<ApiResponse<Vec<Employee>>>> {
    let employees = state
        .report_service
        .list_employees(&user, params.department)
        .await?;
    let total = employees.len();
    Ok(Json(ApiResponse::success(
        Some(employees),
        None,
        Some(Meta::total(total)),
    )))
}

/// Create an employee account
#[utoipa::path(
    post,
    path = "/api/accounts/employees",
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee account created", body = ApiResponse<AccountResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Authority session required"),
        (status = 502, description = "Provisioning service error")
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn create_employee(
    RequireAuthority(user): RequireAuthority,
    State(state): State<AccountState>,
    AppJson(dto): AppJson<CreateEmployeeDto>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponseDto>>)> {
    let account = state.account_service.create_employee(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(account),
            Some("Employee account created, verification email sent".to_string()),
            None,
        )),
    ))
}

/// Create a requester account
#[utoipa::path(
    post,
    path = "/api/accounts/requesters",
    request_body = CreateRequesterDto,
    responses(
        (status = 201, description = "Requester account created", body = ApiResponse<AccountResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Authority session required"),
        (status = 502, description = "Provisioning service error")
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn create_requester(
    RequireAuthority(user): RequireAuthority,
    State(state): State<AccountState>,
    AppJson(dto): AppJson<CreateRequesterDto>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponseDto>>)> {
    let account = state.account_service.create_requester(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(account),
            Some("Requester account created, verification email sent".to_string()),
            None,
        )),
    ))
}
