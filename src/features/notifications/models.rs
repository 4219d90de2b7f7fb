use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::reports::models::{
    ReportPriority, ReportSnapshot, ReportStatus, ReportUpdate,
};

/// What an edit changed, relative to the values the employee was looking at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportChanges {
    #[serde(rename = "prioridadAnterior")]
    pub previous_priority: ReportPriority,
    #[serde(rename = "prioridadNueva")]
    pub new_priority: ReportPriority,
    #[serde(rename = "estadoAnterior")]
    pub previous_status: ReportStatus,
    #[serde(rename = "estadoNuevo")]
    pub new_status: ReportStatus,
    /// New comment, present only when the comment changed (empty when cleared)
    #[serde(rename = "comentario", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn normalized(comment: &Option<String>) -> &str {
    comment.as_deref().unwrap_or_default()
}

impl ReportChanges {
    /// Absent and empty comments compare equal
    pub fn between(before: &ReportSnapshot, after: &ReportUpdate) -> Self {
        let comment = (normalized(&before.comment) != normalized(&after.comment))
            .then(|| normalized(&after.comment).to_string());

        Self {
            previous_priority: before.priority,
            new_priority: after.priority,
            previous_status: before.status,
            new_status: after.status,
            comment,
        }
    }

    pub fn priority_changed(&self) -> bool {
        self.previous_priority != self.new_priority
    }

    pub fn status_changed(&self) -> bool {
        self.previous_status != self.new_status
    }

    pub fn comment_changed(&self) -> bool {
        self.comment.is_some()
    }

    pub fn any(&self) -> bool {
        self.priority_changed() || self.status_changed() || self.comment_changed()
    }
}

/// Payload delivered to the report's creator after an edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportUpdatedNotice {
    pub report_id: Uuid,
    pub recipient_user_id: Uuid,
    pub actor_name: String,
    pub changes: ReportChanges,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(comment: Option<&str>) -> ReportSnapshot {
        ReportSnapshot {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            status: ReportStatus::InProgress,
            priority: ReportPriority::High,
            comment: comment.map(String::from),
        }
    }

    fn update(status: ReportStatus, priority: ReportPriority, comment: Option<&str>) -> ReportUpdate {
        ReportUpdate {
            comment: comment.map(String::from),
            priority,
            status,
        }
    }

    #[test]
    fn test_identical_values_have_no_changes() {
        let before = snapshot(Some("revisando"));
        let after = update(ReportStatus::InProgress, ReportPriority::High, Some("revisando"));
        assert!(!ReportChanges::between(&before, &after).any());
    }

    #[test]
    fn test_absent_and_empty_comment_are_equal() {
        let before = snapshot(None);
        let after = update(ReportStatus::InProgress, ReportPriority::High, Some(""));
        assert!(!ReportChanges::between(&before, &after).any());

        let before = snapshot(Some(""));
        let after = update(ReportStatus::InProgress, ReportPriority::High, None);
        assert!(!ReportChanges::between(&before, &after).any());
    }

    #[test]
    fn test_cleared_comment_is_reported_as_empty() {
        let before = snapshot(Some("esperando pieza"));
        let after = update(ReportStatus::InProgress, ReportPriority::High, None);
        let changes = ReportChanges::between(&before, &after);
        assert_eq!(changes.comment.as_deref(), Some(""));
        assert!(!changes.status_changed());
    }

    #[test]
    fn test_notice_wire_format() {
        let before = ReportSnapshot {
            status: ReportStatus::Pending,
            priority: ReportPriority::Low,
            ..snapshot(None)
        };
        let after = update(ReportStatus::Resolved, ReportPriority::Low, Some("listo"));
        let notice = ReportUpdatedNotice {
            report_id: before.id,
            recipient_user_id: before.creator_id,
            actor_name: "Luis Mora".to_string(),
            changes: ReportChanges::between(&before, &after),
        };

        let value = serde_json::to_value(&notice).unwrap();
        assert_eq!(
            value,
            json!({
                "reportId": before.id,
                "recipientUserId": before.creator_id,
                "actorName": "Luis Mora",
                "changes": {
                    "prioridadAnterior": "Baja",
                    "prioridadNueva": "Baja",
                    "estadoAnterior": "Pendiente",
                    "estadoNuevo": "Resuelto",
                    "comentario": "listo"
                }
            })
        );
    }

    #[test]
    fn test_unchanged_comment_is_omitted_from_wire() {
        let before = snapshot(Some("igual"));
        let after = update(ReportStatus::Resolved, ReportPriority::High, Some("igual"));
        let value = serde_json::to_value(ReportChanges::between(&before, &after)).unwrap();
        assert!(value.get("comentario").is_none());
    }
}
