use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::accounts::handlers::{self, AccountState};
use crate::features::accounts::services::AccountService;
use crate::features::reports::services::ReportService;

/// Authority-only account management routes
pub fn routes(account_service: Arc<AccountService>, report_service: Arc<ReportService>) -> Router {
    let state = AccountState {
        account_service,
        report_service,
    };

    Router::new()
        .route(
            "/api/accounts/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/api/accounts/requesters",
            axum::routing::post(handlers::create_requester),
        )
        .with_state(state)
}
