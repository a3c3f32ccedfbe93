//! Student management, scoped to the caller's company.

use std::collections::HashMap;

use sea_orm::{DatabaseConnection, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation;
use crate::error::{ServiceError, ServiceResult};
use crate::models::student;
use crate::repositories::{DepartmentRepository, StudentRepository};

/// Body of both create and update; an update replaces every field.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct StudentRequest {
    pub name: String,
    pub roll_number: String,
    #[serde(default)]
    pub department_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: i32,
    pub name: String,
    pub roll_number: String,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

impl StudentResponse {
    fn new(student: student::Model, department_names: &HashMap<i32, String>) -> Self {
        let department_name = student
            .department_id
            .and_then(|id| department_names.get(&id).cloned());
        Self {
            id: student.id,
            name: student.name,
            roll_number: student.roll_number,
            department_id: student.department_id,
            department_name,
            created_at: student.created_at,
        }
    }
}

struct ValidStudent {
    name: String,
    roll_number: String,
    department_id: Option<i32>,
}

pub struct StudentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StudentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, company_id: i32) -> ServiceResult<Vec<StudentResponse>> {
        let students = StudentRepository::new(self.db).list(company_id).await?;

        let mut department_ids: Vec<i32> =
            students.iter().filter_map(|s| s.department_id).collect();
        department_ids.sort_unstable();
        department_ids.dedup();
        let names = DepartmentRepository::new(self.db)
            .names_by_ids(company_id, &department_ids)
            .await?;

        Ok(students
            .into_iter()
            .map(|s| StudentResponse::new(s, &names))
            .collect())
    }

    pub async fn create(
        &self,
        company_id: i32,
        request: StudentRequest,
    ) -> ServiceResult<StudentResponse> {
        let valid = self.validate(company_id, &request, None).await?;

        let student = StudentRepository::new(self.db)
            .create(
                company_id,
                &valid.name,
                &valid.roll_number,
                valid.department_id,
            )
            .await?;

        tracing::info!(company_id, student_id = student.id, "Student created");
        self.respond(company_id, student).await
    }

    pub async fn update(
        &self,
        company_id: i32,
        id: i32,
        request: StudentRequest,
    ) -> ServiceResult<StudentResponse> {
        let students = StudentRepository::new(self.db);
        let student = students
            .find(company_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;

        let valid = self.validate(company_id, &request, Some(id)).await?;
        let student = students
            .update(
                student,
                &valid.name,
                &valid.roll_number,
                valid.department_id,
            )
            .await?;

        self.respond(company_id, student).await
    }

    pub async fn delete(&self, company_id: i32, id: i32) -> ServiceResult<()> {
        if !StudentRepository::new(self.db).delete(company_id, id).await? {
            return Err(ServiceError::not_found("Student"));
        }
        tracing::info!(company_id, student_id = id, "Student deleted");
        Ok(())
    }

    async fn validate(
        &self,
        company_id: i32,
        request: &StudentRequest,
        exclude_id: Option<i32>,
    ) -> ServiceResult<ValidStudent> {
        let name = validation::required("Name", &request.name)?;
        let roll_number = validation::required("Roll number", &request.roll_number)?;

        if let Some(department_id) = request.department_id
            && !DepartmentRepository::new(self.db)
                .exists(company_id, department_id)
                .await?
        {
            return Err(ServiceError::validation("Department not found"));
        }

        if StudentRepository::new(self.db)
            .roll_number_taken(company_id, &roll_number, exclude_id)
            .await?
        {
            return Err(ServiceError::validation("Roll number already exists"));
        }

        Ok(ValidStudent {
            name,
            roll_number,
            department_id: request.department_id,
        })
    }

    async fn respond(
        &self,
        company_id: i32,
        student: student::Model,
    ) -> ServiceResult<StudentResponse> {
        let department_ids: Vec<i32> = student.department_id.into_iter().collect();
        let names = DepartmentRepository::new(self.db)
            .names_by_ids(company_id, &department_ids)
            .await?;
        Ok(StudentResponse::new(student, &names))
    }
}
