//! Employee accounts, managed by company admins.

use std::collections::HashMap;

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation;
use crate::credentials::{CredentialService, GENERATED_PASSWORD_LEN, generate_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Role, user};
use crate::repositories::{DepartmentRepository, NewUser, UserRepository};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EmployeeRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
    /// Present only in the response that created the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

impl EmployeeResponse {
    fn new(user: user::Model, department_name: Option<String>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            department_id: user.department_id,
            department_name,
            generated_password: None,
        }
    }
}

pub struct EmployeeService<'a> {
    db: &'a DatabaseConnection,
    credentials: &'a CredentialService,
}

impl<'a> EmployeeService<'a> {
    pub fn new(db: &'a DatabaseConnection, credentials: &'a CredentialService) -> Self {
        Self { db, credentials }
    }

    pub async fn list(&self, company_id: i32) -> ServiceResult<Vec<EmployeeResponse>> {
        let employees = UserRepository::new(self.db)
            .list_employees(company_id)
            .await?;

        let mut department_ids: Vec<i32> =
            employees.iter().filter_map(|e| e.department_id).collect();
        department_ids.sort_unstable();
        department_ids.dedup();
        let names: HashMap<i32, String> = DepartmentRepository::new(self.db)
            .names_by_ids(company_id, &department_ids)
            .await?;

        Ok(employees
            .into_iter()
            .map(|employee| {
                let department_name = employee
                    .department_id
                    .and_then(|id| names.get(&id).cloned());
                EmployeeResponse::new(employee, department_name)
            })
            .collect())
    }

    /// Create an employee with a random password, returned only here.
    pub async fn create(
        &self,
        company_id: i32,
        request: EmployeeRequest,
    ) -> ServiceResult<EmployeeResponse> {
        let name = validation::required("Name", &request.name)?;
        let email = validation::email(&request.email)?;

        let users = UserRepository::new(self.db);
        if users.email_taken(company_id, &email).await? {
            return Err(ServiceError::validation(
                "Email already registered in this company",
            ));
        }

        let department_name = match request.department_id {
            Some(id) => Some(
                DepartmentRepository::new(self.db)
                    .find(company_id, id)
                    .await?
                    .ok_or_else(|| ServiceError::validation("Department not found"))?
                    .name,
            ),
            None => None,
        };

        let password = generate_password(GENERATED_PASSWORD_LEN);
        let password_hash = self.credentials.hash_password(&password)?;

        let employee = users
            .create(NewUser {
                name,
                email,
                password_hash,
                role: Role::Employee,
                company_id,
                department_id: request.department_id,
            })
            .await?;

        tracing::info!(company_id, user_id = employee.id, "Employee created");

        Ok(EmployeeResponse {
            generated_password: Some(password),
            ..EmployeeResponse::new(employee, department_name)
        })
    }

    pub async fn delete(&self, company_id: i32, id: i32) -> ServiceResult<()> {
        if !UserRepository::new(self.db)
            .delete_employee(company_id, id)
            .await?
        {
            return Err(ServiceError::not_found("Employee"));
        }
        tracing::info!(company_id, user_id = id, "Employee deleted");
        Ok(())
    }
}
