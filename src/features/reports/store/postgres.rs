use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{ReportFilter, ReportStore, StoreError, StoreResult};
use crate::features::reports::models::{
    ComposedReport, Department, Employee, FacilityObject, NewReport, Place, Report,
    ReportRecord, ReportUpdate, Requester,
};

const REPORT_COLUMNS: &str = r#"
    r.id, r.description, r.created_at, r.status, r.priority, r.comment, r.images,
    r.creator_id, r.assignee_id, r.object_id
"#;

const PARTY_COLUMNS: &str = r#"
    u.name AS creator_name, u.email AS creator_email,
    e.name AS assignee_name, e.last_name AS assignee_last_name,
    e.email AS assignee_email, e.phone AS assignee_phone,
    e.department AS assignee_department, e.title AS assignee_title
"#;

const PARTY_JOINS: &str = r#"
    FROM reports r
    JOIN requesters u ON u.id = r.creator_id
    LEFT JOIN employees e ON e.id = r.assignee_id
"#;

const FILTER_AND_ORDER: &str = r#"
    WHERE ($1::uuid IS NULL OR r.creator_id = $1)
      AND ($2::uuid IS NULL OR r.assignee_id = $2)
    ORDER BY r.created_at DESC
"#;

#[derive(Debug, FromRow)]
struct ReportRow {
    id: Uuid,
    description: String,
    created_at: DateTime<Utc>,
    status: String,
    priority: String,
    comment: Option<String>,
    images: Vec<String>,
    creator_id: Uuid,
    assignee_id: Option<Uuid>,
    object_id: Option<Uuid>,
}

impl TryFrom<ReportRow> for Report {
    type Error = StoreError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Report {
            id: row.id,
            description: row.description,
            created_at: row.created_at,
            status: row.status.parse().map_err(StoreError::Malformed)?,
            priority: row.priority.parse().map_err(StoreError::Malformed)?,
            comment: row.comment,
            images: row.images,
            creator_id: row.creator_id,
            assignee_id: row.assignee_id,
            object_id: row.object_id,
        })
    }
}

#[derive(Debug, FromRow)]
struct RecordRow {
    #[sqlx(flatten)]
    report: ReportRow,
    creator_name: String,
    creator_email: String,
    assignee_name: Option<String>,
    assignee_last_name: Option<String>,
    assignee_email: Option<String>,
    assignee_phone: Option<String>,
    assignee_department: Option<String>,
    assignee_title: Option<String>,
}

impl TryFrom<RecordRow> for ReportRecord {
    type Error = StoreError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let report = Report::try_from(row.report)?;
        let creator = Requester {
            id: report.creator_id,
            name: row.creator_name,
            email: row.creator_email,
        };

        // Joined columns are all NULL when the assignee is missing
        let assignee = match (report.assignee_id, row.assignee_name, row.assignee_department) {
            (Some(id), Some(name), Some(department)) => Some(Employee {
                id,
                name,
                last_name: row.assignee_last_name.unwrap_or_default(),
                email: row.assignee_email.unwrap_or_default(),
                phone: row.assignee_phone,
                department: department.parse().map_err(StoreError::Malformed)?,
                title: row.assignee_title.unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(ReportRecord {
            report,
            creator,
            assignee,
        })
    }
}

#[derive(Debug, FromRow)]
struct ComposedRow {
    #[sqlx(flatten)]
    record: RecordRow,
    object_name: Option<String>,
    object_category: Option<String>,
    object_place_id: Option<Uuid>,
    place_name: Option<String>,
    place_floor: Option<String>,
}

impl TryFrom<ComposedRow> for ComposedReport {
    type Error = StoreError;

    fn try_from(row: ComposedRow) -> Result<Self, Self::Error> {
        let record = ReportRecord::try_from(row.record)?;

        let object = match (record.report.object_id, row.object_name) {
            (Some(id), Some(name)) => Some(FacilityObject {
                id,
                name,
                category: row.object_category.unwrap_or_default(),
                place_id: row.object_place_id,
            }),
            _ => None,
        };

        let place = match (object.as_ref().and_then(|o| o.place_id), row.place_name) {
            (Some(id), Some(name)) => Some(Place {
                id,
                name,
                floor: row.place_floor.unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(ComposedReport::from_record(record, object, place))
    }
}

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: Uuid,
    name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    department: String,
    title: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = StoreError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: row.id,
            name: row.name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            department: row.department.parse().map_err(StoreError::Malformed)?,
            title: row.title,
        })
    }
}

/// Report store backed by the PostgreSQL database of the backend service
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn query_reports(&self, filter: &ReportFilter) -> StoreResult<Vec<ReportRecord>> {
        let sql = format!(
            "SELECT {}, {} {} {}",
            REPORT_COLUMNS, PARTY_COLUMNS, PARTY_JOINS, FILTER_AND_ORDER
        );

        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(filter.creator_id)
            .bind(filter.assignee_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query reports: {:?}", e);
                StoreError::from(e)
            })?;

        rows.into_iter().map(ReportRecord::try_from).collect()
    }

    async fn query_object(&self, report_id: Uuid) -> StoreResult<Option<FacilityObject>> {
        let object = sqlx::query_as::<_, (Uuid, String, String, Option<Uuid>)>(
            r#"
            SELECT o.id, o.name, o.category, o.place_id
            FROM reports r
            JOIN objects o ON o.id = r.object_id
            WHERE r.id = $1
            "#,
        )
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await?
        .map(|(id, name, category, place_id)| FacilityObject {
            id,
            name,
            category,
            place_id,
        });

        Ok(object)
    }

    async fn query_place(&self, place_id: Uuid) -> StoreResult<Option<Place>> {
        let place = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, name, floor FROM places WHERE id = $1",
        )
        .bind(place_id)
        .fetch_optional(&self.pool)
        .await?
        .map(|(id, name, floor)| Place { id, name, floor });

        Ok(place)
    }

    async fn update_report(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        fields: &ReportUpdate,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE reports
            SET comment = $2, priority = $3, status = $4
            WHERE id = $1 AND assignee_id = $5
            "#,
        )
        .bind(id)
        .bind(&fields.comment)
        .bind(fields.priority.as_str())
        .bind(fields.status.as_str())
        .bind(assignee_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report {}: {:?}", id, e);
            StoreError::from(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_report(&self, new_report: &NewReport) -> StoreResult<Report> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            INSERT INTO reports (id, description, priority, images, creator_id, object_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, description, created_at, status, priority, comment, images,
                      creator_id, assignee_id, object_id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&new_report.description)
        .bind(new_report.priority.as_str())
        .bind(&new_report.images)
        .bind(new_report.creator_id)
        .bind(new_report.object_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            StoreError::from(e)
        })?;

        Report::try_from(row)
    }

    async fn set_assignee(&self, id: Uuid, employee_id: Option<Uuid>) -> StoreResult<()> {
        let result = sqlx::query("UPDATE reports SET assignee_id = $2 WHERE id = $1")
            .bind(id)
            .bind(employee_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("report {}", id)));
        }
        Ok(())
    }

    async fn find_employee(&self, id: Uuid) -> StoreResult<Option<Employee>> {
        sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, last_name, email, phone, department, title
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Employee::try_from)
        .transpose()
    }

    async fn list_employees(&self, department: Option<Department>) -> StoreResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, last_name, email, phone, department, title
            FROM employees
            WHERE ($1::text IS NULL OR department = $1)
            ORDER BY last_name, name
            "#,
        )
        .bind(department.map(|d| d.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Employee::try_from).collect()
    }

    /// One round trip: objects and places come through LEFT JOINs, so a report
    /// without an object simply carries NULL columns.
    async fn query_composed(&self, filter: &ReportFilter) -> StoreResult<Vec<ComposedReport>> {
        let sql = format!(
            r#"
            SELECT {}, {},
                o.name AS object_name, o.category AS object_category,
                o.place_id AS object_place_id,
                p.name AS place_name, p.floor AS place_floor
            {}
            LEFT JOIN objects o ON o.id = r.object_id
            LEFT JOIN places p ON p.id = o.place_id
            {}
            "#,
            REPORT_COLUMNS, PARTY_COLUMNS, PARTY_JOINS, FILTER_AND_ORDER
        );

        let rows = sqlx::query_as::<_, ComposedRow>(&sql)
            .bind(filter.creator_id)
            .bind(filter.assignee_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query composed reports: {:?}", e);
                StoreError::from(e)
            })?;

        rows.into_iter().map(ComposedReport::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{ReportPriority, ReportStatus};

    fn record_row(assignee: bool) -> RecordRow {
        RecordRow {
            report: ReportRow {
                id: Uuid::new_v4(),
                description: "Puerta atorada".to_string(),
                created_at: Utc::now(),
                status: "En Proceso".to_string(),
                priority: "Alta".to_string(),
                comment: Some("revisando".to_string()),
                images: vec!["img/1.jpg".to_string()],
                creator_id: Uuid::new_v4(),
                assignee_id: assignee.then(Uuid::new_v4),
                object_id: None,
            },
            creator_name: "Ana".to_string(),
            creator_email: "ana@example.com".to_string(),
            assignee_name: assignee.then(|| "Luis".to_string()),
            assignee_last_name: assignee.then(|| "Mora".to_string()),
            assignee_email: assignee.then(|| "luis@example.com".to_string()),
            assignee_phone: None,
            assignee_department: assignee.then(|| "sistemas".to_string()),
            assignee_title: assignee.then(|| "Soporte".to_string()),
        }
    }

    #[test]
    fn test_record_row_conversion() {
        let record = ReportRecord::try_from(record_row(true)).unwrap();
        assert_eq!(record.report.status, ReportStatus::InProgress);
        assert_eq!(record.report.priority, ReportPriority::High);
        assert_eq!(record.creator.name, "Ana");
        let assignee = record.assignee.unwrap();
        assert_eq!(assignee.department, Department::Sistemas);
        assert_eq!(assignee.full_name(), "Luis Mora");

        let unassigned = ReportRecord::try_from(record_row(false)).unwrap();
        assert!(unassigned.assignee.is_none());
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let mut row = record_row(false);
        row.report.status = "Cerrado".to_string();
        assert!(matches!(
            ReportRecord::try_from(row),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_composed_row_without_object_has_no_place() {
        let row = ComposedRow {
            record: record_row(false),
            object_name: None,
            object_category: None,
            object_place_id: None,
            place_name: None,
            place_floor: None,
        };
        let composed = ComposedReport::try_from(row).unwrap();
        assert!(composed.object.is_none());
        assert!(composed.place.is_none());
    }

    #[test]
    fn test_composed_row_with_object_and_place() {
        let mut record = record_row(false);
        let object_id = Uuid::new_v4();
        record.report.object_id = Some(object_id);
        let place_id = Uuid::new_v4();

        let composed = ComposedReport::try_from(ComposedRow {
            record,
            object_name: Some("Proyector".to_string()),
            object_category: Some("Electronica".to_string()),
            object_place_id: Some(place_id),
            place_name: Some("Aula 12".to_string()),
            place_floor: Some("2".to_string()),
        })
        .unwrap();

        let object = composed.object.unwrap();
        assert_eq!(object.id, object_id);
        assert_eq!(object.place_id, Some(place_id));
        let place = composed.place.unwrap();
        assert_eq!(place.id, place_id);
        assert_eq!(place.name, "Aula 12");
    }
}
