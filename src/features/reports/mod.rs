pub mod classifier;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::{AssignedReportsFeed, LifecycleService, ReportService};
pub use store::{InMemoryReportStore, PgReportStore, ReportStore};
