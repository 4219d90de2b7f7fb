use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::{RequireAuthority, RequireEmployee, RequireRequester};
use crate::features::reports::dtos::{
    AssignReportDto, ComposedReportResponseDto, CreateReportDto, EditOutcomeResponseDto,
    OwnReportsResponseDto, ReportResponseDto, TaskQueryParams, UpdateReportDto,
};
use crate::features::reports::models::ReportUpdate;
use crate::features::reports::services::{AssignedReportsFeed, LifecycleService, ReportService};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub lifecycle_service: Arc<LifecycleService>,
    pub feed: Arc<AssignedReportsFeed>,
}

/// List the reports filed by the authenticated requester
#[utoipa::path(
    get,
    path = "/api/reports/mine",
    responses(
        (status = 200, description = "Requester's reports with status summary", body = ApiResponse<OwnReportsResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requester session required"),
        (status = 503, description = "Report store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_own_reports(
    RequireRequester(user): RequireRequester,
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<OwnReportsResponseDto>>> {
    let own = state
        .report_service
        .fetch_own_reports(&user, user.user_id)
        .await?;

    let total = own.reports.len();
    let dto = OwnReportsResponseDto {
        summary: own.summary,
        reports: own.reports.into_iter().map(ReportResponseDto::from).collect(),
    };
    Ok(Json(ApiResponse::success(
        Some(dto),
        None,
        Some(Meta::total(total)),
    )))
}

/// Submit a new report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requester session required")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    RequireRequester(user): RequireRequester,
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let report = state.report_service.create_report(&user, &dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// List reports assigned to the authenticated employee, with object and place
#[utoipa::path(
    get,
    path = "/api/employee/reports",
    responses(
        (status = 200, description = "Assigned reports, newest first", body = ApiResponse<Vec<ComposedReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Employee session required"),
        (status = 503, description = "Report store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "employee"
)]
pub async fn list_assigned_reports(
    RequireEmployee(user): RequireEmployee,
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ComposedReportResponseDto>>>> {
    let reports = state.feed.refresh(&user, user.user_id).await?;
    let total = reports.len();
    let dtos: Vec<ComposedReportResponseDto> = reports.into_iter().map(|c| c.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// List the authenticated employee's tasks
#[utoipa::path(
    get,
    path = "/api/employee/tasks",
    params(TaskQueryParams),
    responses(
        (status = 200, description = "Assigned reports without object/place", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Employee session required"),
        (status = 503, description = "Report store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "employee"
)]
pub async fn list_tasks(
    RequireEmployee(user): RequireEmployee,
    State(state): State<ReportState>,
    AppQuery(params): AppQuery<TaskQueryParams>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let tasks = state
        .report_service
        .fetch_tasks_for_employee(&user, user.user_id, params.sort)
        .await?;
    let total = tasks.len();
    let dtos: Vec<ReportResponseDto> = tasks.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// Update status, priority and comment of an assigned report
#[utoipa::path(
    put,
    path = "/api/employee/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Edit processed", body = ApiResponse<EditOutcomeResponseDto>),
        (status = 400, description = "Invalid status or priority"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Employee session required"),
        (status = 500, description = "Changes could not be saved")
    ),
    security(("bearer_auth" = [])),
    tag = "employee"
)]
pub async fn update_report(
    RequireEmployee(user): RequireEmployee,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<EditOutcomeResponseDto>>> {
    let snapshots = state.feed.current_snapshots(&user, user.user_id).await?;
    let edit: ReportUpdate = dto.into();
    let outcome = state
        .lifecycle_service
        .apply_edit(&user, &snapshots, id, edit.clone())
        .await?;

    if outcome.applied {
        // The saved values become the baseline for the next edit
        state.feed.record_edit(user.user_id, id, &edit);
        if let Err(e) = state.feed.refresh(&user, user.user_id).await {
            tracing::warn!("Feed refresh after edit of report {} failed: {}", id, e);
        }
    }

    let changes = outcome.changes.as_ref();
    let dto = EditOutcomeResponseDto {
        report_id: outcome.report_id,
        applied: outcome.applied,
        priority_changed: changes.is_some_and(|c| c.priority_changed()),
        status_changed: changes.is_some_and(|c| c.status_changed()),
        comment_changed: changes.is_some_and(|c| c.comment_changed()),
        notification_queued: outcome.notification_queued,
    };
    let message = if outcome.applied {
        "Report updated"
    } else {
        "Report is not assigned to you, nothing was saved"
    };

    Ok(Json(ApiResponse::success(
        Some(dto),
        Some(message.to_string()),
        None,
    )))
}

/// Assign a report to an employee, or clear its assignee
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/assignee",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = AssignReportDto,
    responses(
        (status = 200, description = "Assignee updated"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Authority session required"),
        (status = 404, description = "Report or employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn assign_report(
    RequireAuthority(user): RequireAuthority,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AssignReportDto>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .report_service
        .reassign_report(&user, id, dto.employee_id)
        .await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Assignee updated".to_string()),
        None,
    )))
}
