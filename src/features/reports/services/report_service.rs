use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::reports::classifier::triage_order;
use crate::features::reports::dtos::{CreateReportDto, TaskSort};
use crate::features::reports::models::{
    ComposedReport, Department, Employee, NewReport, Report, ReportSummary,
};
use crate::features::reports::store::{ReportFilter, ReportStore, StoreError};

/// Reads against the store surface as "unavailable" so clients can retry
pub(crate) fn read_failure(e: StoreError) -> AppError {
    AppError::StoreUnavailable(e.to_string())
}

/// Rejected writes surface as persistence errors
pub(crate) fn write_failure(e: StoreError) -> AppError {
    AppError::Persistence(e.to_string())
}

/// A requester's own reports with per-status counts
#[derive(Debug, Clone)]
pub struct OwnReports {
    pub reports: Vec<Report>,
    pub summary: ReportSummary,
}

/// Service for report queries and submissions
pub struct ReportService {
    store: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Reports assigned to the employee, composed with object and place, newest first
    pub async fn fetch_assigned_reports(
        &self,
        session: &AuthenticatedUser,
        employee_id: Uuid,
    ) -> Result<Vec<ComposedReport>> {
        session.require_self(Role::Employee, employee_id)?;

        let mut reports = self
            .store
            .query_composed(&ReportFilter::assigned_to(employee_id))
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to fetch assigned reports for {}: {}",
                    employee_id,
                    e
                );
                read_failure(e)
            })?;

        // The store filter is not trusted to be exact
        reports.retain(|c| c.report.assignee_id == Some(employee_id));
        reports.sort_by(|a, b| b.report.created_at.cmp(&a.report.created_at));

        tracing::debug!(
            "Fetched {} assigned reports for employee {}",
            reports.len(),
            employee_id
        );
        Ok(reports)
    }

    /// Every report filed by the requester, plus a status summary
    pub async fn fetch_own_reports(
        &self,
        session: &AuthenticatedUser,
        requester_id: Uuid,
    ) -> Result<OwnReports> {
        session.require_self(Role::Requester, requester_id)?;

        let mut reports: Vec<Report> = self
            .store
            .query_reports(&ReportFilter::created_by(requester_id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch reports of requester {}: {}", requester_id, e);
                read_failure(e)
            })?
            .into_iter()
            .map(|record| record.report)
            .filter(|report| report.creator_id == requester_id)
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let summary = ReportSummary::from_reports(&reports);
        Ok(OwnReports { reports, summary })
    }

    /// Every report assigned to the employee, without object/place composition
    pub async fn fetch_tasks_for_employee(
        &self,
        session: &AuthenticatedUser,
        employee_id: Uuid,
        sort: TaskSort,
    ) -> Result<Vec<Report>> {
        session.require_self(Role::Employee, employee_id)?;

        let mut tasks: Vec<Report> = self
            .store
            .query_reports(&ReportFilter::assigned_to(employee_id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch tasks for employee {}: {}", employee_id, e);
                read_failure(e)
            })?
            .into_iter()
            .map(|record| record.report)
            .filter(|report| report.assignee_id == Some(employee_id))
            .collect();

        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if sort == TaskSort::Triage {
            // Stable, so newest-first is kept within each bucket
            tasks.sort_by(|a, b| triage_order((a.status, a.priority), (b.status, b.priority)));
        }

        Ok(tasks)
    }

    /// Submit a new report on behalf of the requester
    pub async fn create_report(
        &self,
        session: &AuthenticatedUser,
        dto: &CreateReportDto,
    ) -> Result<Report> {
        let creator_id = session.require_role(Role::Requester)?;
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let new_report = NewReport {
            description: dto.description.trim().to_string(),
            priority: dto.priority.unwrap_or_default(),
            images: dto.images.clone(),
            creator_id,
            object_id: dto.object_id,
        };

        let report = self.store.insert_report(&new_report).await.map_err(|e| {
            tracing::error!("Failed to create report for {}: {}", creator_id, e);
            write_failure(e)
        })?;

        tracing::info!("Created report {} by requester {}", report.id, creator_id);
        Ok(report)
    }

    /// Assign the report to an employee, or clear the assignment
    pub async fn reassign_report(
        &self,
        session: &AuthenticatedUser,
        report_id: Uuid,
        employee_id: Option<Uuid>,
    ) -> Result<()> {
        let authority_id = session.require_role(Role::Authority)?;

        if let Some(employee_id) = employee_id {
            self.store
                .find_employee(employee_id)
                .await
                .map_err(read_failure)?
                .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;
        }

        self.store
            .set_assignee(report_id, employee_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => {
                    AppError::NotFound(format!("Report {} not found", report_id))
                }
                other => {
                    tracing::error!("Failed to reassign report {}: {}", report_id, other);
                    write_failure(other)
                }
            })?;

        tracing::info!(
            "Report {} assigned to {:?} by authority {}",
            report_id,
            employee_id,
            authority_id
        );
        Ok(())
    }

    /// Employees, optionally restricted to one department
    pub async fn list_employees(
        &self,
        session: &AuthenticatedUser,
        department: Option<Department>,
    ) -> Result<Vec<Employee>> {
        session.require_role(Role::Authority)?;

        self.store
            .list_employees(department)
            .await
            .map_err(read_failure)
    }
}
