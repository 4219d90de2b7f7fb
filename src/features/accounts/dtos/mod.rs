pub mod account_dto;

pub use account_dto::{
    AccountResponseDto, CreateEmployeeDto, CreateRequesterDto, EmployeeQueryParams,
};
