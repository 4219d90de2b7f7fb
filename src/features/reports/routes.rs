use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::{AssignedReportsFeed, LifecycleService, ReportService};

/// Create routes for the reports feature
///
/// All routes require authentication (auth middleware applied by caller);
/// role checks happen in the handlers' guards
pub fn routes(
    report_service: Arc<ReportService>,
    lifecycle_service: Arc<LifecycleService>,
    feed: Arc<AssignedReportsFeed>,
) -> Router {
    let state = ReportState {
        report_service,
        lifecycle_service,
        feed,
    };

    Router::new()
        // Requester
        .route("/api/reports", post(handlers::create_report))
        .route("/api/reports/mine", get(handlers::list_own_reports))
        // Employee
        .route("/api/employee/reports", get(handlers::list_assigned_reports))
        .route("/api/employee/reports/{id}", put(handlers::update_report))
        .route("/api/employee/tasks", get(handlers::list_tasks))
        // Authority
        .route("/api/reports/{id}/assignee", patch(handlers::assign_report))
        .with_state(state)
}
