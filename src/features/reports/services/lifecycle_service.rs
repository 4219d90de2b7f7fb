use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::notifications::{NotificationQueue, ReportChanges, ReportUpdatedNotice};
use crate::features::reports::models::{ReportSnapshot, ReportUpdate};
use crate::features::reports::services::report_service::write_failure;
use crate::features::reports::store::ReportStore;

/// What an edit did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub report_id: Uuid,
    /// False when the report was not in the caller's list, or is no longer
    /// assigned to the caller, and nothing was written
    pub applied: bool,
    pub changes: Option<ReportChanges>,
    pub notification_queued: bool,
}

impl EditOutcome {
    fn skipped(report_id: Uuid) -> Self {
        Self {
            report_id,
            applied: false,
            changes: None,
            notification_queued: false,
        }
    }
}

/// Applies employee edits (status, priority, comment) to assigned reports.
///
/// Status transitions are permissive: any of the three statuses may follow any other.
pub struct LifecycleService {
    store: Arc<dyn ReportStore>,
    notifications: NotificationQueue,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn ReportStore>, notifications: NotificationQueue) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Persist an edit and notify the report's creator of what changed.
    ///
    /// Changes are computed against `snapshots`, the list the employee was
    /// looking at, not against a fresh read. The write is unconditional even
    /// when nothing changed, but only lands while the report is still assigned
    /// to the acting employee.
    pub async fn apply_edit(
        &self,
        session: &AuthenticatedUser,
        snapshots: &[ReportSnapshot],
        report_id: Uuid,
        edit: ReportUpdate,
    ) -> Result<EditOutcome> {
        let employee_id = session.require_role(Role::Employee)?;

        let Some(before) = snapshots.iter().find(|s| s.id == report_id) else {
            tracing::debug!(
                "Report {} not in the current list of employee {}, edit ignored",
                report_id,
                employee_id
            );
            return Ok(EditOutcome::skipped(report_id));
        };

        let written = self
            .store
            .update_report(report_id, employee_id, &edit)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save edit of report {}: {}", report_id, e);
                write_failure(e)
            })?;

        if !written {
            tracing::warn!(
                "Report {} is no longer assigned to employee {}, edit ignored",
                report_id,
                employee_id
            );
            return Ok(EditOutcome::skipped(report_id));
        }

        let changes = ReportChanges::between(before, &edit);
        if !changes.any() {
            tracing::debug!("Report {} saved without changes", report_id);
            return Ok(EditOutcome {
                report_id,
                applied: true,
                changes: None,
                notification_queued: false,
            });
        }

        let notification_queued = self.notifications.enqueue(ReportUpdatedNotice {
            report_id,
            recipient_user_id: before.creator_id,
            actor_name: session.actor_name(),
            changes: changes.clone(),
        });

        tracing::info!(
            "Report {} updated by employee {} (priority: {}, status: {}, comment: {})",
            report_id,
            employee_id,
            changes.priority_changed(),
            changes.status_changed(),
            changes.comment_changed()
        );

        Ok(EditOutcome {
            report_id,
            applied: true,
            changes: Some(changes),
            notification_queued,
        })
    }
}
