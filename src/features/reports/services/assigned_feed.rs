use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::models::{ComposedReport, ReportSnapshot, ReportUpdate};
use crate::features::reports::services::report_service::ReportService;

#[derive(Debug, Default)]
struct FeedEntry {
    /// Generation of the most recently issued refresh
    issued: u64,
    reports: Option<Vec<ComposedReport>>,
}

/// Latest view of each employee's assigned reports.
///
/// Every refresh takes a generation number; a response is stored only if no
/// newer refresh was issued while it was in flight, so an older, slower fetch
/// can never overwrite a newer list.
pub struct AssignedReportsFeed {
    report_service: Arc<ReportService>,
    entries: Mutex<HashMap<Uuid, FeedEntry>>,
}

impl AssignedReportsFeed {
    pub fn new(report_service: Arc<ReportService>) -> Self {
        Self {
            report_service,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, FeedEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, employee_id: Uuid) -> u64 {
        let mut entries = self.entries();
        let entry = entries.entry(employee_id).or_default();
        entry.issued += 1;
        entry.issued
    }

    /// Store the result of refresh `generation`; false if it was superseded
    fn complete(&self, employee_id: Uuid, generation: u64, reports: &[ComposedReport]) -> bool {
        let mut entries = self.entries();
        let entry = entries.entry(employee_id).or_default();
        if entry.issued != generation {
            return false;
        }
        entry.reports = Some(reports.to_vec());
        true
    }

    /// Fetch the employee's assigned reports and make them the current list
    pub async fn refresh(
        &self,
        session: &AuthenticatedUser,
        employee_id: Uuid,
    ) -> Result<Vec<ComposedReport>> {
        let generation = self.begin(employee_id);

        let reports = self
            .report_service
            .fetch_assigned_reports(session, employee_id)
            .await?;

        if !self.complete(employee_id, generation, &reports) {
            tracing::debug!(
                "Discarding stale feed refresh {} for employee {}",
                generation,
                employee_id
            );
        }

        Ok(reports)
    }

    /// Apply a saved edit to the cached list so it becomes the baseline for the
    /// next edit even if no refresh succeeds afterwards. Refreshes issued
    /// before the edit are superseded. Returns false if the report is not listed.
    pub fn record_edit(&self, employee_id: Uuid, report_id: Uuid, edit: &ReportUpdate) -> bool {
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(&employee_id) else {
            return false;
        };
        let Some(composed) = entry
            .reports
            .iter_mut()
            .flatten()
            .find(|c| c.report.id == report_id)
        else {
            return false;
        };

        composed.report.comment = edit.comment.clone();
        composed.report.priority = edit.priority;
        composed.report.status = edit.status;
        entry.issued += 1;
        true
    }

    /// The current list as edit snapshots, if the feed was ever loaded
    pub fn snapshots(&self, employee_id: Uuid) -> Option<Vec<ReportSnapshot>> {
        self.entries()
            .get(&employee_id)
            .and_then(|entry| entry.reports.as_ref())
            .map(|reports| {
                reports
                    .iter()
                    .map(|c| ReportSnapshot::from(&c.report))
                    .collect()
            })
    }

    /// Current snapshots, loading the feed first if it is empty
    pub async fn current_snapshots(
        &self,
        session: &AuthenticatedUser,
        employee_id: Uuid,
    ) -> Result<Vec<ReportSnapshot>> {
        if let Some(snapshots) = self.snapshots(employee_id) {
            return Ok(snapshots);
        }

        let reports = self.refresh(session, employee_id).await?;
        Ok(reports
            .iter()
            .map(|c| ReportSnapshot::from(&c.report))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::auth::model::Role;
    use crate::features::reports::models::{Department, ReportPriority, ReportStatus};
    use crate::shared::test_helpers::{session_for, Fixture};

    fn feed(fx: &Fixture) -> AssignedReportsFeed {
        AssignedReportsFeed::new(Arc::new(ReportService::new(fx.store.clone())))
    }

    #[tokio::test]
    async fn test_refresh_populates_snapshots() {
        let fx = Fixture::new();
        let requester = fx.requester();
        let emp = fx.employee(Department::Mantenimiento);
        let report = fx.report(requester.id, Some(emp.id), 10);
        let feed = feed(&fx);

        assert!(feed.snapshots(emp.id).is_none());

        let reports = feed
            .refresh(&session_for(Role::Employee, emp.id), emp.id)
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);

        let snapshots = feed.snapshots(emp.id).unwrap();
        assert_eq!(snapshots, vec![ReportSnapshot::from(&report)]);
    }

    #[test]
    fn test_stale_refresh_is_discarded() {
        let fx = Fixture::new();
        let requester = fx.requester();
        let emp = fx.employee(Department::Sistemas);
        let feed = feed(&fx);

        let older = fx.report(requester.id, Some(emp.id), 10);
        let mut newer_view = older.clone();
        newer_view.status = ReportStatus::Resolved;

        let composed = |report| ComposedReport {
            report,
            creator: requester.clone(),
            assignee: Some(emp.clone()),
            object: None,
            place: None,
        };

        let first = feed.begin(emp.id);
        let second = feed.begin(emp.id);

        // The second refresh resolves first, then the first one arrives late
        assert!(feed.complete(emp.id, second, &[composed(newer_view.clone())]));
        assert!(!feed.complete(emp.id, first, &[composed(older)]));

        let snapshots = feed.snapshots(emp.id).unwrap();
        assert_eq!(snapshots[0].status, ReportStatus::Resolved);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let fx = Fixture::new();
        let requester = fx.requester();
        let emp = fx.employee(Department::Mantenimiento);
        fx.report(requester.id, Some(emp.id), 10);
        let feed = feed(&fx);
        let session = session_for(Role::Employee, emp.id);

        feed.refresh(&session, emp.id).await.unwrap();
        fx.store.set_fail_reads(true);

        let result = feed.refresh(&session, emp.id).await;
        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
        assert_eq!(feed.snapshots(emp.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_edit_updates_baseline_and_supersedes_inflight_refresh() {
        let fx = Fixture::new();
        let requester = fx.requester();
        let emp = fx.employee(Department::Mantenimiento);
        let report = fx.report(requester.id, Some(emp.id), 10);
        let feed = feed(&fx);
        let session = session_for(Role::Employee, emp.id);
        feed.refresh(&session, emp.id).await.unwrap();

        let in_flight = feed.begin(emp.id);
        let edit = ReportUpdate {
            comment: Some("cambiado".to_string()),
            priority: ReportPriority::High,
            status: ReportStatus::InProgress,
        };
        assert!(feed.record_edit(emp.id, report.id, &edit));
        assert!(!feed.record_edit(emp.id, Uuid::new_v4(), &edit));

        let stale = ComposedReport {
            report: report.clone(),
            creator: requester.clone(),
            assignee: Some(emp.clone()),
            object: None,
            place: None,
        };
        assert!(!feed.complete(emp.id, in_flight, &[stale]));

        let snapshots = feed.snapshots(emp.id).unwrap();
        assert_eq!(snapshots[0].status, ReportStatus::InProgress);
        assert_eq!(snapshots[0].priority, ReportPriority::High);
        assert_eq!(snapshots[0].comment.as_deref(), Some("cambiado"));
    }

    #[test]
    fn test_record_edit_without_loaded_feed() {
        let fx = Fixture::new();
        let feed = feed(&fx);
        let edit = ReportUpdate {
            comment: None,
            priority: ReportPriority::Low,
            status: ReportStatus::Resolved,
        };
        assert!(!feed.record_edit(Uuid::new_v4(), Uuid::new_v4(), &edit));
    }

    #[tokio::test]
    async fn test_current_snapshots_loads_on_first_use() {
        let fx = Fixture::new();
        let requester = fx.requester();
        let emp = fx.employee(Department::Mantenimiento);
        fx.report(requester.id, Some(emp.id), 10);
        fx.report(requester.id, Some(emp.id), 20);
        let feed = feed(&fx);

        let snapshots = feed
            .current_snapshots(&session_for(Role::Employee, emp.id), emp.id)
            .await
            .unwrap();
        assert_eq!(snapshots.len(), 2);
        assert!(feed.snapshots(emp.id).is_some());
    }
}
