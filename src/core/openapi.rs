use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::accounts::{dtos as accounts_dtos, handlers as accounts_handlers};
use crate::features::auth;
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::get_me,
        // Reports (requester / authority)
        reports_handlers::report_handler::list_own_reports,
        reports_handlers::report_handler::create_report,
        reports_handlers::report_handler::assign_report,
        // Employee
        reports_handlers::report_handler::list_assigned_reports,
        reports_handlers::report_handler::list_tasks,
        reports_handlers::report_handler::update_report,
        // Accounts
        accounts_handlers::account_handler::list_employees,
        accounts_handlers::account_handler::create_employee,
        accounts_handlers::account_handler::create_requester,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::Role,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportPriority,
            reports_models::ReportSummary,
            reports_models::Department,
            reports_models::Requester,
            reports_models::Employee,
            reports_models::FacilityObject,
            reports_models::Place,
            reports_dtos::ReportResponseDto,
            reports_dtos::ComposedReportResponseDto,
            reports_dtos::OwnReportsResponseDto,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::EditOutcomeResponseDto,
            reports_dtos::AssignReportDto,
            reports_dtos::TaskSort,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<Vec<reports_dtos::ComposedReportResponseDto>>,
            ApiResponse<reports_dtos::OwnReportsResponseDto>,
            ApiResponse<reports_dtos::EditOutcomeResponseDto>,
            // Accounts
            accounts_dtos::CreateEmployeeDto,
            accounts_dtos::CreateRequesterDto,
            accounts_dtos::AccountResponseDto,
            ApiResponse<accounts_dtos::AccountResponseDto>,
            ApiResponse<Vec<reports_models::Employee>>,
        )
    ),
    tags(
        (name = "auth", description = "Session introspection"),
        (name = "reports", description = "Report submission, tracking and assignment"),
        (name = "employee", description = "Assigned reports and task updates for employees"),
        (name = "accounts", description = "Employee and requester provisioning (authority only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Facility Reports API",
        version = "0.1.0",
        description = "Maintenance and systems report tracking for school facilities",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Overrides the document info with the configured values
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
