use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::facility::{FacilityObject, Place};
use super::people::{Employee, Requester};
use super::report::{Report, ReportStatus};

/// A report joined with its creator and assignee (one relational fetch)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub report: Report,
    pub creator: Requester,
    pub assignee: Option<Employee>,
}

/// A report enriched with every related entity.
///
/// `object` and `place` are `None` both when the report has no object and
/// when the secondary lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedReport {
    pub report: Report,
    pub creator: Requester,
    pub assignee: Option<Employee>,
    pub object: Option<FacilityObject>,
    pub place: Option<Place>,
}

impl ComposedReport {
    pub fn from_record(
        record: ReportRecord,
        object: Option<FacilityObject>,
        place: Option<Place>,
    ) -> Self {
        Self {
            report: record.report,
            creator: record.creator,
            assignee: record.assignee,
            object,
            place,
        }
    }
}

/// Per-status counts over a requester's reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl ReportSummary {
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Self {
        reports
            .into_iter()
            .fold(Self::default(), |mut summary, report| {
                summary.total += 1;
                match report.status {
                    ReportStatus::Pending => summary.pending += 1,
                    ReportStatus::InProgress => summary.in_progress += 1,
                    ReportStatus::Resolved => summary.resolved += 1,
                }
                summary
            })
    }
}
