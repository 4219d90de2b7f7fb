use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status as stored and sent over the wire.
///
/// Transitions are permissive: any status may be assigned from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "En Proceso")]
    InProgress,
    #[serde(rename = "Resuelto")]
    Resolved,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pendiente",
            ReportStatus::InProgress => "En Proceso",
            ReportStatus::Resolved => "Resuelto",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the stored values
impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown report status '{}'", s))
    }
}

/// Report priority as stored and sent over the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ReportPriority {
    #[serde(rename = "Baja")]
    Low,
    #[default]
    #[serde(rename = "Media")]
    Medium,
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Urgente")]
    Urgent,
}

impl ReportPriority {
    pub const ALL: [ReportPriority; 4] = [
        ReportPriority::Low,
        ReportPriority::Medium,
        ReportPriority::High,
        ReportPriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPriority::Low => "Baja",
            ReportPriority::Medium => "Media",
            ReportPriority::High => "Alta",
            ReportPriority::Urgent => "Urgente",
        }
    }
}

impl std::fmt::Display for ReportPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| format!("Unknown report priority '{}'", s))
    }
}

/// Report record as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub comment: Option<String>,
    pub images: Vec<String>,
    pub creator_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub object_id: Option<Uuid>,
}

/// Data for creating a new report (requester submission)
#[derive(Debug, Clone)]
pub struct NewReport {
    pub description: String,
    pub priority: ReportPriority,
    pub images: Vec<String>,
    pub creator_id: Uuid,
    pub object_id: Option<Uuid>,
}

/// Fields an employee may change on an assigned report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportUpdate {
    pub comment: Option<String>,
    pub priority: ReportPriority,
    pub status: ReportStatus,
}

/// Pre-edit values of a report as the caller last saw them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub comment: Option<String>,
}

impl From<&Report> for ReportSnapshot {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id,
            creator_id: r.creator_id,
            status: r.status,
            priority: r.priority,
            comment: r.comment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&ReportStatus::InProgress).unwrap(),
            "\"En Proceso\""
        );
        let status: ReportStatus = serde_json::from_str("\"Resuelto\"").unwrap();
        assert_eq!(status, ReportStatus::Resolved);
    }

    #[test]
    fn test_status_parse_is_case_sensitive() {
        assert_eq!("Pendiente".parse::<ReportStatus>(), Ok(ReportStatus::Pending));
        assert!("pendiente".parse::<ReportStatus>().is_err());
        assert!("En proceso".parse::<ReportStatus>().is_err());
        assert!("".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn test_priority_parse_and_default() {
        assert_eq!("Urgente".parse::<ReportPriority>(), Ok(ReportPriority::Urgent));
        assert!("ALTA".parse::<ReportPriority>().is_err());
        assert_eq!(ReportPriority::default(), ReportPriority::Medium);
    }
}
