use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use uuid::Uuid;

use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::reports::models::{
    Department, Employee, Report, ReportPriority, ReportStatus, Requester,
};
use crate::features::reports::store::InMemoryReportStore;

pub fn session_for(role: Role, user_id: Uuid) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        role,
        display_name: Some(format!(
            "{} {}",
            FirstName().fake::<String>(),
            LastName().fake::<String>()
        )),
        email: Some(SafeEmail().fake()),
    }
}

/// Wrap a router so every request carries the given session
pub fn with_session(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

/// In-memory store plus helpers to seed it with realistic records
pub struct Fixture {
    pub store: Arc<InMemoryReportStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryReportStore::new()),
        }
    }

    pub fn requester(&self) -> Requester {
        let requester = Requester {
            id: Uuid::new_v4(),
            name: FirstName().fake(),
            email: SafeEmail().fake(),
        };
        self.store.insert_requester(requester.clone()).unwrap();
        requester
    }

    pub fn employee(&self, department: Department) -> Employee {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: FirstName().fake(),
            last_name: LastName().fake(),
            email: SafeEmail().fake(),
            phone: Some("0991234567".to_string()),
            department,
            title: "Tecnico".to_string(),
        };
        self.store.insert_employee(employee.clone()).unwrap();
        employee
    }

    /// A pending, medium priority report created `age_minutes` ago
    pub fn report(&self, creator_id: Uuid, assignee_id: Option<Uuid>, age_minutes: i64) -> Report {
        let report = Report {
            id: Uuid::new_v4(),
            description: Sentence(3..8).fake(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
            status: ReportStatus::Pending,
            priority: ReportPriority::Medium,
            comment: None,
            images: vec![],
            creator_id,
            assignee_id,
            object_id: None,
        };
        self.store.put_report(report.clone()).unwrap();
        report
    }
}
