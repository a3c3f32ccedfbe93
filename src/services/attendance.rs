//! Daily attendance rosters.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use metrics::counter;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{AttendanceStatus, attendance, student};
use crate::repositories::{AttendanceRepository, DepartmentRepository, StudentRepository};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AttendanceEntry {
    pub student_id: i32,
    pub status: AttendanceStatus,
}

/// The full roster for one day; it replaces whatever was recorded before.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MarkAttendanceRequest {
    pub date: NaiveDate,
    pub records: Vec<AttendanceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentSummary {
    pub id: i32,
    pub name: String,
    pub roll_number: String,
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    pub id: i32,
    pub student_id: i32,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub student: Option<StudentSummary>,
}

pub struct AttendanceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AttendanceService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replace the company's roster for `request.date`.
    ///
    /// Every student must belong to the company and appear once; otherwise
    /// nothing is changed.
    pub async fn mark_bulk(
        &self,
        company_id: i32,
        request: MarkAttendanceRequest,
    ) -> ServiceResult<Vec<AttendanceResponse>> {
        let mut seen = HashSet::with_capacity(request.records.len());
        for entry in &request.records {
            if !seen.insert(entry.student_id) {
                return Err(ServiceError::validation(format!(
                    "Student {} appears more than once",
                    entry.student_id
                )));
            }
        }
        let student_ids: Vec<i32> = request.records.iter().map(|r| r.student_id).collect();

        let txn = self.db.begin().await?;

        let students = StudentRepository::new(&txn)
            .find_many(company_id, &student_ids)
            .await?;
        if let Some(missing) = student_ids.iter().find(|id| !students.contains_key(*id)) {
            return Err(ServiceError::not_found(format!("Student {missing}")));
        }

        let roster: Vec<(i32, AttendanceStatus)> = request
            .records
            .iter()
            .map(|r| (r.student_id, r.status))
            .collect();
        let (replaced, records) = AttendanceRepository::new(&txn)
            .replace_for_date(company_id, request.date, &roster)
            .await?;
        let responses = attach_students(&txn, company_id, records, students).await?;

        txn.commit().await?;

        counter!("attendance_records_marked_total").increment(responses.len() as u64);
        tracing::info!(
            company_id,
            date = %request.date,
            replaced,
            inserted = responses.len(),
            "Attendance roster replaced"
        );

        Ok(responses)
    }

    /// Records for one date, or all dates when `date` is `None`; newest date first.
    pub async fn list(
        &self,
        company_id: i32,
        date: Option<NaiveDate>,
    ) -> ServiceResult<Vec<AttendanceResponse>> {
        let records = AttendanceRepository::new(self.db)
            .list(company_id, date)
            .await?;
        self.with_students(company_id, records).await
    }

    pub async fn history(&self, company_id: i32) -> ServiceResult<Vec<AttendanceResponse>> {
        let records = AttendanceRepository::new(self.db)
            .history(company_id)
            .await?;
        self.with_students(company_id, records).await
    }

    async fn with_students(
        &self,
        company_id: i32,
        records: Vec<attendance::Model>,
    ) -> ServiceResult<Vec<AttendanceResponse>> {
        let mut student_ids: Vec<i32> = records.iter().map(|r| r.student_id).collect();
        student_ids.sort_unstable();
        student_ids.dedup();

        let students = StudentRepository::new(self.db)
            .find_many(company_id, &student_ids)
            .await?;
        attach_students(self.db, company_id, records, students).await
    }
}

async fn attach_students<C: ConnectionTrait>(
    db: &C,
    company_id: i32,
    records: Vec<attendance::Model>,
    students: HashMap<i32, student::Model>,
) -> ServiceResult<Vec<AttendanceResponse>> {
    let mut department_ids: Vec<i32> = students.values().filter_map(|s| s.department_id).collect();
    department_ids.sort_unstable();
    department_ids.dedup();
    let department_names = DepartmentRepository::new(db)
        .names_by_ids(company_id, &department_ids)
        .await?;

    Ok(records
        .into_iter()
        .map(|record| {
            let student = students.get(&record.student_id).map(|s| StudentSummary {
                id: s.id,
                name: s.name.clone(),
                roll_number: s.roll_number.clone(),
                department_name: s
                    .department_id
                    .and_then(|id| department_names.get(&id).cloned()),
            });
            AttendanceResponse {
                id: record.id,
                student_id: record.student_id,
                date: record.date,
                status: record.status,
                student,
            }
        })
        .collect())
}
