pub mod account_handler;

pub use account_handler::{create_employee, create_requester, list_employees, AccountState};
