//! Display classification for report status and priority.
//!
//! One canonical color table per category. Lookups are total: any value
//! outside the fixed set (including the empty string) maps to the neutral color.

use std::cmp::Ordering;

use crate::features::reports::models::{ReportPriority, ReportStatus};
use crate::shared::constants::NEUTRAL_COLOR;

const STATUS_COLORS: [(ReportStatus, &str); 3] = [
    (ReportStatus::Pending, "#FFA726"),
    (ReportStatus::InProgress, "#21D0B2"),
    (ReportStatus::Resolved, "#34F5C5"),
];

const PRIORITY_COLORS: [(ReportPriority, &str); 4] = [
    (ReportPriority::Urgent, "#FF5252"),
    (ReportPriority::High, "#FFA726"),
    (ReportPriority::Medium, "#21D0B2"),
    (ReportPriority::Low, "#8B9BA8"),
];

/// Color for a raw status value
pub fn status_color(status: &str) -> &'static str {
    STATUS_COLORS
        .iter()
        .find(|(s, _)| s.as_str() == status)
        .map_or(NEUTRAL_COLOR, |(_, color)| color)
}

/// Color for a raw priority value
pub fn priority_color(priority: &str) -> &'static str {
    PRIORITY_COLORS
        .iter()
        .find(|(p, _)| p.as_str() == priority)
        .map_or(NEUTRAL_COLOR, |(_, color)| color)
}

impl ReportStatus {
    pub fn color(&self) -> &'static str {
        status_color(self.as_str())
    }

    /// Workflow position: pending first, resolved last
    pub fn rank(&self) -> u8 {
        match self {
            ReportStatus::Pending => 0,
            ReportStatus::InProgress => 1,
            ReportStatus::Resolved => 2,
        }
    }
}

impl ReportPriority {
    pub fn color(&self) -> &'static str {
        priority_color(self.as_str())
    }

    /// Urgency position: urgent first, low last
    pub fn rank(&self) -> u8 {
        match self {
            ReportPriority::Urgent => 0,
            ReportPriority::High => 1,
            ReportPriority::Medium => 2,
            ReportPriority::Low => 3,
        }
    }
}

/// Work-queue ordering: open before resolved, then most urgent first
pub fn triage_order(
    a: (ReportStatus, ReportPriority),
    b: (ReportStatus, ReportPriority),
) -> Ordering {
    a.0.rank()
        .cmp(&b.0.rank())
        .then_with(|| a.1.rank().cmp(&b.1.rank()))
}
