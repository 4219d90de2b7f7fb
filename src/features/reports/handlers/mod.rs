pub mod report_handler;

pub use report_handler::{
    assign_report, create_report, list_assigned_reports, list_own_reports, list_tasks,
    update_report, ReportState,
};
