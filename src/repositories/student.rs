//! Student repository

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::models::{Student, student};

/// Ids bound per `IN (...)` lookup.
const LOOKUP_CHUNK_SIZE: usize = 1000;

/// Repository for students of a single company
pub struct StudentRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StudentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All students of a company, most recently created first.
    pub async fn list(&self, company_id: i32) -> Result<Vec<student::Model>, DbErr> {
        Student::find()
            .filter(student::Column::CompanyId.eq(company_id))
            .order_by_desc(student::Column::CreatedAt)
            .order_by_desc(student::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find(&self, company_id: i32, id: i32) -> Result<Option<student::Model>, DbErr> {
        Student::find_by_id(id)
            .filter(student::Column::CompanyId.eq(company_id))
            .one(self.db)
            .await
    }

    /// Students of the company among `ids`, keyed by id.
    pub async fn find_many(
        &self,
        company_id: i32,
        ids: &[i32],
    ) -> Result<HashMap<i32, student::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut students = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(LOOKUP_CHUNK_SIZE) {
            let found = Student::find()
                .filter(student::Column::CompanyId.eq(company_id))
                .filter(student::Column::Id.is_in(chunk.iter().copied()))
                .all(self.db)
                .await?;
            students.extend(found.into_iter().map(|s| (s.id, s)));
        }

        Ok(students)
    }

    pub async fn count(&self, company_id: i32) -> Result<u64, DbErr> {
        Student::find()
            .filter(student::Column::CompanyId.eq(company_id))
            .count(self.db)
            .await
    }

    /// Whether `roll_number` belongs to another student of the company.
    pub async fn roll_number_taken(
        &self,
        company_id: i32,
        roll_number: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = Student::find()
            .filter(student::Column::CompanyId.eq(company_id))
            .filter(student::Column::RollNumber.eq(roll_number));
        if let Some(id) = exclude_id {
            query = query.filter(student::Column::Id.ne(id));
        }
        Ok(query.count(self.db).await? > 0)
    }

    pub async fn create(
        &self,
        company_id: i32,
        name: &str,
        roll_number: &str,
        department_id: Option<i32>,
    ) -> Result<student::Model, DbErr> {
        student::ActiveModel {
            name: Set(name.to_string()),
            roll_number: Set(roll_number.to_string()),
            department_id: Set(department_id),
            company_id: Set(company_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        student: student::Model,
        name: &str,
        roll_number: &str,
        department_id: Option<i32>,
    ) -> Result<student::Model, DbErr> {
        let mut active = student.into_active_model();
        active.name = Set(name.to_string());
        active.roll_number = Set(roll_number.to_string());
        active.department_id = Set(department_id);
        active.update(self.db).await
    }

    /// Delete a student of the company; `false` if no row matched.
    pub async fn delete(&self, company_id: i32, id: i32) -> Result<bool, DbErr> {
        let result = Student::delete_many()
            .filter(student::Column::Id.eq(id))
            .filter(student::Column::CompanyId.eq(company_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
