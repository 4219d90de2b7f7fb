pub mod report_dto;

pub use report_dto::{
    AssignReportDto, ComposedReportResponseDto, CreateReportDto, EditOutcomeResponseDto,
    OwnReportsResponseDto, ReportResponseDto, TaskQueryParams, TaskSort, UpdateReportDto,
};
