pub mod dispatcher;
pub mod models;
pub mod queue;

pub use dispatcher::HttpNotificationDispatcher;
pub use models::{ReportChanges, ReportUpdatedNotice};
pub use queue::{NotificationQueue, NotificationWorker};
