//! Boundary to the external relational store holding reports and their related records.

mod memory;
mod postgres;

pub use memory::InMemoryReportStore;
pub use postgres::PgReportStore;

use async_trait::async_trait;
use futures::future::join_all;
use uuid::Uuid;

use crate::features::reports::models::{
    ComposedReport, Department, Employee, FacilityObject, NewReport, Place, Report,
    ReportRecord, ReportUpdate,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store rejected the operation: {0}")]
    Rejected(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("stored record is malformed: {0}")]
    Malformed(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => StoreError::Rejected(db.to_string()),
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Malformed(e.to_string())
            }
            other => StoreError::Connection(other.to_string()),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Which reports a query selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub creator_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
}

impl ReportFilter {
    pub fn created_by(requester_id: Uuid) -> Self {
        Self {
            creator_id: Some(requester_id),
            ..Self::default()
        }
    }

    pub fn assigned_to(employee_id: Uuid) -> Self {
        Self {
            assignee_id: Some(employee_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, report: &Report) -> bool {
        self.creator_id.is_none_or(|id| report.creator_id == id)
            && self
                .assignee_id
                .is_none_or(|id| report.assignee_id == Some(id))
    }
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Reports matching the filter with creator and assignee joined, newest first
    async fn query_reports(&self, filter: &ReportFilter) -> StoreResult<Vec<ReportRecord>>;

    /// Object referenced by the given report, if any
    async fn query_object(&self, report_id: Uuid) -> StoreResult<Option<FacilityObject>>;

    async fn query_place(&self, place_id: Uuid) -> StoreResult<Option<Place>>;

    /// Overwrite the employee-editable fields of a report, but only while it is
    /// still assigned to `assignee_id`. Returns false when no such report matched.
    async fn update_report(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        fields: &ReportUpdate,
    ) -> StoreResult<bool>;

    async fn insert_report(&self, report: &NewReport) -> StoreResult<Report>;

    /// Replace the assignee of a report (`None` clears it)
    async fn set_assignee(&self, id: Uuid, employee_id: Option<Uuid>) -> StoreResult<()>;

    async fn find_employee(&self, id: Uuid) -> StoreResult<Option<Employee>>;

    async fn list_employees(&self, department: Option<Department>) -> StoreResult<Vec<Employee>>;

    /// Reports matching the filter composed with their object and place.
    ///
    /// The default runs the secondary lookups per report (concurrently within
    /// the batch). A failed or empty lookup yields `None` for that report only.
    async fn query_composed(&self, filter: &ReportFilter) -> StoreResult<Vec<ComposedReport>> {
        let records = self.query_reports(filter).await?;
        let composed = records.into_iter().map(|record| async move {
            let (object, place) = self.lookup_object_and_place(record.report.id).await;
            ComposedReport::from_record(record, object, place)
        });
        Ok(join_all(composed).await)
    }

    /// Object then place for one report, degrading each failure to `None`
    async fn lookup_object_and_place(
        &self,
        report_id: Uuid,
    ) -> (Option<FacilityObject>, Option<Place>) {
        let object = match self.query_object(report_id).await {
            Ok(object) => object,
            Err(e) => {
                tracing::warn!("Object lookup failed for report {}: {}", report_id, e);
                return (None, None);
            }
        };

        let Some(place_id) = object.as_ref().and_then(|o| o.place_id) else {
            return (object, None);
        };

        match self.query_place(place_id).await {
            Ok(place) => (object, place),
            Err(e) => {
                tracing::warn!(
                    "Place lookup failed for report {} (place {}): {}",
                    report_id,
                    place_id,
                    e
                );
                (object, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::features::reports::models::{ReportPriority, ReportStatus};

    fn report(creator_id: Uuid, assignee_id: Option<Uuid>) -> Report {
        Report {
            id: Uuid::new_v4(),
            description: "Fuga de agua".to_string(),
            created_at: Utc::now(),
            status: ReportStatus::Pending,
            priority: ReportPriority::Medium,
            comment: None,
            images: vec![],
            creator_id,
            assignee_id,
            object_id: None,
        }
    }

    #[test]
    fn test_filter_matches() {
        let requester = Uuid::new_v4();
        let employee = Uuid::new_v4();

        let assigned = report(requester, Some(employee));
        let unassigned = report(requester, None);

        assert!(ReportFilter::assigned_to(employee).matches(&assigned));
        assert!(!ReportFilter::assigned_to(employee).matches(&unassigned));
        assert!(!ReportFilter::assigned_to(Uuid::new_v4()).matches(&assigned));
        assert!(ReportFilter::created_by(requester).matches(&unassigned));
        assert!(ReportFilter::default().matches(&unassigned));
    }

    #[test]
    fn test_sqlx_errors_map_to_store_errors() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Connection(_)
        ));
    }
}
