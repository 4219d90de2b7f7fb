use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{ReportFilter, ReportStore, StoreError, StoreResult};
use crate::features::reports::models::{
    Department, Employee, FacilityObject, NewReport, Place, Report, ReportRecord, ReportStatus,
    ReportUpdate, Requester,
};

#[derive(Default)]
struct Tables {
    reports: HashMap<Uuid, Report>,
    requesters: HashMap<Uuid, Requester>,
    employees: HashMap<Uuid, Employee>,
    objects: HashMap<Uuid, FacilityObject>,
    places: HashMap<Uuid, Place>,
}

/// Process-local store used for development (`REPORT_STORE=memory`) and tests.
///
/// Reads and writes can be made to fail on demand to exercise the
/// unavailable-store paths.
#[derive(Default)]
pub struct InMemoryReportStore {
    tables: RwLock<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_object_lookups: AtomicBool,
    update_calls: AtomicUsize,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Connection("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Connection("in-memory store lock poisoned".to_string()))
    }

    fn check_reads(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("store is offline".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("store refused the write".to_string()));
        }
        Ok(())
    }

    pub fn insert_requester(&self, requester: Requester) -> StoreResult<()> {
        self.write()?.requesters.insert(requester.id, requester);
        Ok(())
    }

    pub fn insert_employee(&self, employee: Employee) -> StoreResult<()> {
        self.write()?.employees.insert(employee.id, employee);
        Ok(())
    }

    pub fn insert_place(&self, place: Place) -> StoreResult<()> {
        self.write()?.places.insert(place.id, place);
        Ok(())
    }

    pub fn insert_object(&self, object: FacilityObject) -> StoreResult<()> {
        self.write()?.objects.insert(object.id, object);
        Ok(())
    }

    /// Put a fully-formed report in place, keeping its id and timestamp
    pub fn put_report(&self, report: Report) -> StoreResult<()> {
        self.write()?.reports.insert(report.id, report);
        Ok(())
    }

    pub fn report(&self, id: Uuid) -> StoreResult<Option<Report>> {
        Ok(self.read()?.reports.get(&id).cloned())
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_object_lookups(&self, fail: bool) {
        self.fail_object_lookups.store(fail, Ordering::SeqCst);
    }

    /// Number of `update_report` calls received, successful or not
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn query_reports(&self, filter: &ReportFilter) -> StoreResult<Vec<ReportRecord>> {
        self.check_reads()?;
        let tables = self.read()?;

        let mut records: Vec<ReportRecord> = tables
            .reports
            .values()
            .filter(|report| filter.matches(report))
            .filter_map(|report| {
                // Reports whose creator is gone are not returned (inner join)
                let creator = tables.requesters.get(&report.creator_id)?.clone();
                let assignee = report
                    .assignee_id
                    .and_then(|id| tables.employees.get(&id).cloned());
                Some(ReportRecord {
                    report: report.clone(),
                    creator,
                    assignee,
                })
            })
            .collect();

        records.sort_by(|a, b| b.report.created_at.cmp(&a.report.created_at));
        Ok(records)
    }

    async fn query_object(&self, report_id: Uuid) -> StoreResult<Option<FacilityObject>> {
        self.check_reads()?;
        if self.fail_object_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("object lookup timed out".to_string()));
        }
        let tables = self.read()?;
        Ok(tables
            .reports
            .get(&report_id)
            .and_then(|r| r.object_id)
            .and_then(|id| tables.objects.get(&id).cloned()))
    }

    async fn query_place(&self, place_id: Uuid) -> StoreResult<Option<Place>> {
        self.check_reads()?;
        Ok(self.read()?.places.get(&place_id).cloned())
    }

    async fn update_report(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        fields: &ReportUpdate,
    ) -> StoreResult<bool> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;
        let mut tables = self.write()?;
        let Some(report) = tables
            .reports
            .get_mut(&id)
            .filter(|r| r.assignee_id == Some(assignee_id))
        else {
            return Ok(false);
        };
        report.comment = fields.comment.clone();
        report.priority = fields.priority;
        report.status = fields.status;
        Ok(true)
    }

    async fn insert_report(&self, new_report: &NewReport) -> StoreResult<Report> {
        self.check_writes()?;
        let mut tables = self.write()?;
        if !tables.requesters.contains_key(&new_report.creator_id) {
            return Err(StoreError::Rejected(format!(
                "unknown requester {}",
                new_report.creator_id
            )));
        }
        if let Some(object_id) = new_report.object_id {
            if !tables.objects.contains_key(&object_id) {
                return Err(StoreError::Rejected(format!("unknown object {}", object_id)));
            }
        }

        let report = Report {
            id: Uuid::now_v7(),
            description: new_report.description.clone(),
            created_at: Utc::now(),
            status: ReportStatus::Pending,
            priority: new_report.priority,
            comment: None,
            images: new_report.images.clone(),
            creator_id: new_report.creator_id,
            assignee_id: None,
            object_id: new_report.object_id,
        };
        tables.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn set_assignee(&self, id: Uuid, employee_id: Option<Uuid>) -> StoreResult<()> {
        self.check_writes()?;
        let mut tables = self.write()?;
        if let Some(employee_id) = employee_id {
            if !tables.employees.contains_key(&employee_id) {
                return Err(StoreError::NotFound(format!("employee {}", employee_id)));
            }
        }
        let report = tables
            .reports
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("report {}", id)))?;
        report.assignee_id = employee_id;
        Ok(())
    }

    async fn find_employee(&self, id: Uuid) -> StoreResult<Option<Employee>> {
        self.check_reads()?;
        Ok(self.read()?.employees.get(&id).cloned())
    }

    async fn list_employees(&self, department: Option<Department>) -> StoreResult<Vec<Employee>> {
        self.check_reads()?;
        let mut employees: Vec<Employee> = self
            .read()?
            .employees
            .values()
            .filter(|e| department.is_none_or(|d| e.department == d))
            .cloned()
            .collect();
        employees.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(employees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportPriority;
    use chrono::Duration;

    fn requester() -> Requester {
        Requester {
            id: Uuid::new_v4(),
            name: "Lucia Gomez".to_string(),
            email: "lucia@example.com".to_string(),
        }
    }

    fn employee(department: Department, last_name: &str) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Mario".to_string(),
            last_name: last_name.to_string(),
            email: format!("{}@example.com", last_name.to_lowercase()),
            phone: None,
            department,
            title: "Tecnico".to_string(),
        }
    }

    fn report(creator_id: Uuid, assignee_id: Option<Uuid>, age_minutes: i64) -> Report {
        Report {
            id: Uuid::new_v4(),
            description: "Proyector no enciende".to_string(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
            status: ReportStatus::Pending,
            priority: ReportPriority::Medium,
            comment: None,
            images: vec![],
            creator_id,
            assignee_id,
            object_id: None,
        }
    }

    #[tokio::test]
    async fn test_query_reports_filters_and_orders_newest_first() {
        let store = InMemoryReportStore::new();
        let creator = requester();
        let worker = employee(Department::Mantenimiento, "Perez");
        store.insert_requester(creator.clone()).unwrap();
        store.insert_employee(worker.clone()).unwrap();

        let older = report(creator.id, Some(worker.id), 30);
        let newer = report(creator.id, Some(worker.id), 5);
        let other = report(creator.id, None, 1);
        store.put_report(older.clone()).unwrap();
        store.put_report(newer.clone()).unwrap();
        store.put_report(other).unwrap();

        let records = store
            .query_reports(&ReportFilter::assigned_to(worker.id))
            .await
            .unwrap();

        let ids: Vec<Uuid> = records.iter().map(|r| r.report.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(records[0].assignee.as_ref(), Some(&worker));
        assert_eq!(records[0].creator, creator);
    }

    #[tokio::test]
    async fn test_update_report_overwrites_editable_fields() {
        let store = InMemoryReportStore::new();
        let creator = requester();
        store.insert_requester(creator.clone()).unwrap();
        let worker = employee(Department::Mantenimiento, "Paz");
        store.insert_employee(worker.clone()).unwrap();
        let original = report(creator.id, Some(worker.id), 0);
        store.put_report(original.clone()).unwrap();

        let update = ReportUpdate {
            comment: Some("Cambio de lampara".to_string()),
            priority: ReportPriority::High,
            status: ReportStatus::InProgress,
        };
        assert!(store
            .update_report(original.id, worker.id, &update)
            .await
            .unwrap());

        let stored = store.report(original.id).unwrap().unwrap();
        assert_eq!(stored.comment.as_deref(), Some("Cambio de lampara"));
        assert_eq!(stored.priority, ReportPriority::High);
        assert_eq!(stored.status, ReportStatus::InProgress);
        assert_eq!(stored.description, original.description);
        assert_eq!(store.update_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_report_requires_current_assignee() {
        let store = InMemoryReportStore::new();
        let creator = requester();
        store.insert_requester(creator.clone()).unwrap();
        let previous = employee(Department::Sistemas, "Vera");
        let current = employee(Department::Sistemas, "Cano");
        store.insert_employee(previous.clone()).unwrap();
        store.insert_employee(current.clone()).unwrap();
        let original = report(creator.id, Some(current.id), 0);
        store.put_report(original.clone()).unwrap();

        let update = ReportUpdate {
            comment: None,
            priority: ReportPriority::Urgent,
            status: ReportStatus::Resolved,
        };
        assert!(!store
            .update_report(original.id, previous.id, &update)
            .await
            .unwrap());
        assert!(!store
            .update_report(Uuid::new_v4(), current.id, &update)
            .await
            .unwrap());

        let stored = store.report(original.id).unwrap().unwrap();
        assert_eq!(stored.status, original.status);
        assert_eq!(stored.priority, original.priority);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = InMemoryReportStore::new();
        store.set_fail_reads(true);
        assert!(matches!(
            store.query_reports(&ReportFilter::default()).await,
            Err(StoreError::Connection(_))
        ));

        store.set_fail_reads(false);
        store.set_fail_writes(true);
        let result = store
            .set_assignee(Uuid::new_v4(), None)
            .await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_list_employees_by_department() {
        let store = InMemoryReportStore::new();
        store
            .insert_employee(employee(Department::Sistemas, "Zavala"))
            .unwrap();
        store
            .insert_employee(employee(Department::Mantenimiento, "Ruiz"))
            .unwrap();
        store
            .insert_employee(employee(Department::Sistemas, "Alvarez"))
            .unwrap();

        let sistemas = store
            .list_employees(Some(Department::Sistemas))
            .await
            .unwrap();
        let names: Vec<&str> = sistemas.iter().map(|e| e.last_name.as_str()).collect();
        assert_eq!(names, vec!["Alvarez", "Zavala"]);

        assert_eq!(store.list_employees(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_set_assignee_requires_known_employee() {
        let store = InMemoryReportStore::new();
        let creator = requester();
        store.insert_requester(creator.clone()).unwrap();
        let r = report(creator.id, None, 0);
        store.put_report(r.clone()).unwrap();

        assert!(matches!(
            store.set_assignee(r.id, Some(Uuid::new_v4())).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(store.set_assignee(r.id, None).await.is_ok());
    }
}
