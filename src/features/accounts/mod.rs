//! Account provisioning for the authority.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/accounts/employees` | List employees (optional `department`) |
//! | POST | `/api/accounts/employees` | Create an employee account |
//! | POST | `/api/accounts/requesters` | Create a requester account |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use clients::ProvisioningClient;
pub use services::AccountService;
