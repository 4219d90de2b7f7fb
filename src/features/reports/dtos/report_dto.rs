use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{
    ComposedReport, Employee, FacilityObject, Place, Report, ReportPriority, ReportStatus,
    ReportSummary, ReportUpdate, Requester,
};

/// Response DTO for report, with display colors resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub status_color: String,
    pub priority: ReportPriority,
    pub priority_color: String,
    pub comment: Option<String>,
    pub images: Vec<String>,
    pub creator_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub object_id: Option<Uuid>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            description: r.description,
            created_at: r.created_at,
            status_color: r.status.color().to_string(),
            status: r.status,
            priority_color: r.priority.color().to_string(),
            priority: r.priority,
            comment: r.comment,
            images: r.images,
            creator_id: r.creator_id,
            assignee_id: r.assignee_id,
            object_id: r.object_id,
        }
    }
}

/// Response DTO for a report with its creator, assignee, object and place
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComposedReportResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub creator: Requester,
    pub assignee: Option<Employee>,
    pub object: Option<FacilityObject>,
    #[serde(rename = "lugar")]
    pub place: Option<Place>,
}

impl From<ComposedReport> for ComposedReportResponseDto {
    fn from(c: ComposedReport) -> Self {
        Self {
            report: c.report.into(),
            creator: c.creator,
            assignee: c.assignee,
            object: c.object,
            place: c.place,
        }
    }
}

/// A requester's reports with per-status counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnReportsResponseDto {
    pub summary: ReportSummary,
    pub reports: Vec<ReportResponseDto>,
}

/// Request DTO for submitting a new report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    #[validate(
        custom(
            function = "crate::shared::validation::validate_not_blank",
            message = "Description is required"
        ),
        length(max = 2000, message = "Description must not exceed 2000 characters")
    )]
    pub description: String,

    /// Defaults to `Media`
    #[serde(default)]
    pub priority: Option<ReportPriority>,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 images can be attached"))]
    pub images: Vec<String>,

    #[serde(default)]
    pub object_id: Option<Uuid>,
}

/// Request DTO for an employee editing an assigned report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportDto {
    pub comment: Option<String>,
    pub priority: ReportPriority,
    pub status: ReportStatus,
}

impl From<UpdateReportDto> for ReportUpdate {
    fn from(dto: UpdateReportDto) -> Self {
        Self {
            comment: dto.comment,
            priority: dto.priority,
            status: dto.status,
        }
    }
}

/// Result of an employee edit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcomeResponseDto {
    pub report_id: Uuid,
    /// False when the report is not in the employee's list or no longer assigned to them
    pub applied: bool,
    pub priority_changed: bool,
    pub status_changed: bool,
    pub comment_changed: bool,
    pub notification_queued: bool,
}

/// Request DTO for (re)assigning a report; `null` clears the assignee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignReportDto {
    pub employee_id: Option<Uuid>,
}

/// Ordering of the employee task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskSort {
    /// Newest first
    #[default]
    Recent,
    /// Open before resolved, then most urgent first
    Triage,
}

/// Query parameters for the employee task list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TaskQueryParams {
    #[serde(default)]
    pub sort: TaskSort,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn report() -> Report {
        Report {
            id: Uuid::new_v4(),
            description: "Luz fundida".to_string(),
            created_at: Utc::now(),
            status: ReportStatus::InProgress,
            priority: ReportPriority::Urgent,
            comment: None,
            images: vec![],
            creator_id: Uuid::new_v4(),
            assignee_id: None,
            object_id: None,
        }
    }

    #[test]
    fn test_response_carries_colors() {
        let dto = ReportResponseDto::from(report());
        assert_eq!(dto.status_color, "#21D0B2");
        assert_eq!(dto.priority_color, "#FF5252");
    }

    #[test]
    fn test_composed_place_is_serialized_as_lugar() {
        let r = report();
        let composed = ComposedReport {
            creator: Requester {
                id: r.creator_id,
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
            },
            report: r,
            assignee: None,
            object: None,
            place: None,
        };

        let value = serde_json::to_value(ComposedReportResponseDto::from(composed)).unwrap();
        assert!(value.get("lugar").is_some());
        assert!(value.get("place").is_none());
        assert_eq!(value["status"], "En Proceso");
    }

    #[test]
    fn test_response_uses_camel_case_keys() {
        let value = serde_json::to_value(ReportResponseDto::from(report())).unwrap();
        for key in ["createdAt", "statusColor", "priorityColor", "creatorId", "assigneeId"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value.get("status_color").is_none());

        let assign: AssignReportDto =
            serde_json::from_value(serde_json::json!({ "employeeId": null })).unwrap();
        assert!(assign.employee_id.is_none());
    }

    #[test]
    fn test_create_report_requires_description() {
        let dto: CreateReportDto =
            serde_json::from_value(serde_json::json!({ "description": "   " })).unwrap();
        assert!(dto.validate().is_err());

        let dto: CreateReportDto =
            serde_json::from_value(serde_json::json!({ "description": "Silla rota" })).unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.priority.is_none());
        assert!(dto.images.is_empty());
    }

    #[test]
    fn test_task_sort_defaults_to_recent() {
        let params: TaskQueryParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.sort, TaskSort::Recent);
    }
}
