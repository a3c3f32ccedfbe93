//! Company repository
//!
//! Companies are the tenancy root, so lookups here are global. Deleting a
//! company removes everything it owns inside one transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};

use crate::models::{
    Attendance, Company, Department, Student, User, attendance, company, department, student,
    user,
};

/// Repository for company rows
pub struct CompanyRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CompanyRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<company::Model>, DbErr> {
        Company::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<company::Model>, DbErr> {
        Company::find()
            .filter(company::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    pub async fn name_taken(&self, name: &str) -> Result<bool, DbErr> {
        let count = Company::find()
            .filter(company::Column::Name.eq(name))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, name: &str, theme_id: &str) -> Result<company::Model, DbErr> {
        company::ActiveModel {
            name: Set(name.to_string()),
            theme_id: Set(theme_id.to_string()),
            custom_labels: Set(None),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Apply a partial settings update; `None` leaves a field unchanged.
    pub async fn update_settings(
        &self,
        company: company::Model,
        theme_id: Option<String>,
        custom_labels: Option<String>,
    ) -> Result<company::Model, DbErr> {
        if theme_id.is_none() && custom_labels.is_none() {
            return Ok(company);
        }

        let mut active = company.into_active_model();
        if let Some(theme_id) = theme_id {
            active.theme_id = Set(theme_id);
        }
        if let Some(custom_labels) = custom_labels {
            active.custom_labels = Set(Some(custom_labels));
        }
        active.update(self.db).await
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> CompanyRepository<'a, C> {
    /// Delete a company with its attendance, students, users and departments.
    ///
    /// Returns `false` if no such company exists.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        Attendance::delete_many()
            .filter(attendance::Column::CompanyId.eq(id))
            .exec(&txn)
            .await?;
        Student::delete_many()
            .filter(student::Column::CompanyId.eq(id))
            .exec(&txn)
            .await?;
        User::delete_many()
            .filter(user::Column::CompanyId.eq(id))
            .exec(&txn)
            .await?;
        Department::delete_many()
            .filter(department::Column::CompanyId.eq(id))
            .exec(&txn)
            .await?;
        let result = Company::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(company_id = id, "Company deleted");
        Ok(result.rows_affected > 0)
    }
}
