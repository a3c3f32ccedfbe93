//! Department management, scoped to the caller's company.

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation;
use crate::error::{ServiceError, ServiceResult};
use crate::models::department;
use crate::repositories::DepartmentRepository;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DepartmentRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepartmentResponse {
    pub id: i32,
    pub name: String,
}

impl From<department::Model> for DepartmentResponse {
    fn from(department: department::Model) -> Self {
        Self {
            id: department.id,
            name: department.name,
        }
    }
}

pub struct DepartmentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DepartmentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, company_id: i32) -> ServiceResult<Vec<DepartmentResponse>> {
        let departments = DepartmentRepository::new(self.db).list(company_id).await?;
        Ok(departments.into_iter().map(Into::into).collect())
    }

    pub async fn create(
        &self,
        company_id: i32,
        request: DepartmentRequest,
    ) -> ServiceResult<DepartmentResponse> {
        let name = validation::required("Name", &request.name)?;
        let departments = DepartmentRepository::new(self.db);

        if departments.name_taken(company_id, &name, None).await? {
            return Err(ServiceError::validation("Department already exists"));
        }

        let department = departments.create(company_id, &name).await?;
        tracing::info!(company_id, department_id = department.id, "Department created");
        Ok(department.into())
    }

    pub async fn update(
        &self,
        company_id: i32,
        id: i32,
        request: DepartmentRequest,
    ) -> ServiceResult<DepartmentResponse> {
        let departments = DepartmentRepository::new(self.db);
        let department = departments
            .find(company_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department"))?;

        let name = validation::required("Name", &request.name)?;
        if departments.name_taken(company_id, &name, Some(id)).await? {
            return Err(ServiceError::validation("Department name already exists"));
        }

        Ok(departments.rename(department, &name).await?.into())
    }

    /// Delete a department; its students and users keep existing without one.
    pub async fn delete(&self, company_id: i32, id: i32) -> ServiceResult<()> {
        if !DepartmentRepository::new(self.db).delete(company_id, id).await? {
            return Err(ServiceError::not_found("Department"));
        }
        Ok(())
    }
}
