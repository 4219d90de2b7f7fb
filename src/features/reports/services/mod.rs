mod assigned_feed;
mod lifecycle_service;
mod report_service;

pub use assigned_feed::AssignedReportsFeed;
pub use lifecycle_service::LifecycleService;
pub use report_service::ReportService;
