mod composed;
mod facility;
mod people;
mod report;

pub use composed::{ComposedReport, ReportRecord, ReportSummary};
pub use facility::{FacilityObject, Place};
pub use people::{Department, Employee, Requester};
pub use report::{NewReport, Report, ReportPriority, ReportSnapshot, ReportStatus, ReportUpdate};
