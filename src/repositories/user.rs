//! User repository
//!
//! Lookups by id are global because they run before the caller's company is
//! known (token resolution). Everything else is company-scoped.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::models::{Role, User, user};

/// Fields of a user about to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub company_id: i32,
    pub department_id: Option<i32>,
}

/// Repository for user accounts
pub struct UserRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_email(
        &self,
        company_id: i32,
        email: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::CompanyId.eq(company_id))
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await
    }

    /// Whether `email` is registered in any company.
    pub async fn email_registered_anywhere(&self, email: &str) -> Result<bool, DbErr> {
        let count = User::find()
            .filter(user::Column::Email.eq(email))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn email_taken(&self, company_id: i32, email: &str) -> Result<bool, DbErr> {
        Ok(self.find_by_email(company_id, email).await?.is_some())
    }

    pub async fn create(&self, new_user: NewUser) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role),
            company_id: Set(new_user.company_id),
            department_id: Set(new_user.department_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Employee accounts of a company, newest first.
    pub async fn list_employees(&self, company_id: i32) -> Result<Vec<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::CompanyId.eq(company_id))
            .filter(user::Column::Role.eq(Role::Employee))
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(self.db)
            .await
    }

    /// Delete an employee of the company. Admin accounts never match.
    pub async fn delete_employee(&self, company_id: i32, id: i32) -> Result<bool, DbErr> {
        let result = User::delete_many()
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::CompanyId.eq(company_id))
            .filter(user::Column::Role.eq(Role::Employee))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
