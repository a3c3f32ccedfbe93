//! Department repository

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Expr,
};

use crate::models::{Department, Student, User, department, student, user};

/// Repository for departments of a single company
pub struct DepartmentRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DepartmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All departments of a company, alphabetical.
    pub async fn list(&self, company_id: i32) -> Result<Vec<department::Model>, DbErr> {
        Department::find()
            .filter(department::Column::CompanyId.eq(company_id))
            .order_by_asc(department::Column::Name)
            .order_by_asc(department::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find(
        &self,
        company_id: i32,
        id: i32,
    ) -> Result<Option<department::Model>, DbErr> {
        Department::find_by_id(id)
            .filter(department::Column::CompanyId.eq(company_id))
            .one(self.db)
            .await
    }

    pub async fn exists(&self, company_id: i32, id: i32) -> Result<bool, DbErr> {
        Ok(self.find(company_id, id).await?.is_some())
    }

    /// Whether `name` is used by another department of the company.
    pub async fn name_taken(
        &self,
        company_id: i32,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = Department::find()
            .filter(department::Column::CompanyId.eq(company_id))
            .filter(department::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(department::Column::Id.ne(id));
        }
        Ok(query.count(self.db).await? > 0)
    }

    pub async fn create(&self, company_id: i32, name: &str) -> Result<department::Model, DbErr> {
        department::ActiveModel {
            name: Set(name.to_string()),
            company_id: Set(company_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn rename(
        &self,
        department: department::Model,
        name: &str,
    ) -> Result<department::Model, DbErr> {
        let mut active = department.into_active_model();
        active.name = Set(name.to_string());
        active.update(self.db).await
    }

    /// Names of the given departments, keyed by id. Ids outside the company are skipped.
    pub async fn names_by_ids(
        &self,
        company_id: i32,
        ids: &[i32],
    ) -> Result<HashMap<i32, String>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, String)> = Department::find()
            .select_only()
            .column(department::Column::Id)
            .column(department::Column::Name)
            .filter(department::Column::CompanyId.eq(company_id))
            .filter(department::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// Name of a single optional department reference.
    pub async fn name_of(
        &self,
        company_id: i32,
        id: Option<i32>,
    ) -> Result<Option<String>, DbErr> {
        match id {
            Some(id) => Ok(self.find(company_id, id).await?.map(|d| d.name)),
            None => Ok(None),
        }
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> DepartmentRepository<'a, C> {
    /// Delete a department, detaching its students and users first.
    ///
    /// Returns `false` if the department does not exist in the company.
    pub async fn delete(&self, company_id: i32, id: i32) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        let owned = Department::find_by_id(id)
            .filter(department::Column::CompanyId.eq(company_id))
            .one(&txn)
            .await?
            .is_some();
        if !owned {
            return Ok(false);
        }

        let students = Student::update_many()
            .col_expr(student::Column::DepartmentId, Expr::value(Option::<i32>::None))
            .filter(student::Column::CompanyId.eq(company_id))
            .filter(student::Column::DepartmentId.eq(id))
            .exec(&txn)
            .await?;
        let users = User::update_many()
            .col_expr(user::Column::DepartmentId, Expr::value(Option::<i32>::None))
            .filter(user::Column::CompanyId.eq(company_id))
            .filter(user::Column::DepartmentId.eq(id))
            .exec(&txn)
            .await?;
        Department::delete_many()
            .filter(department::Column::Id.eq(id))
            .filter(department::Column::CompanyId.eq(company_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(
            company_id,
            department_id = id,
            detached_students = students.rows_affected,
            detached_users = users.rows_affected,
            "Department deleted"
        );
        Ok(true)
    }
}
