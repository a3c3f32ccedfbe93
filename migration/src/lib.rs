//! Database migrations for the attendance tracking API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_01_000001_create_companies;
mod m2025_06_01_000002_create_departments;
mod m2025_06_01_000003_create_users;
mod m2025_06_01_000004_create_students;
mod m2025_06_01_000005_create_attendance;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_01_000001_create_companies::Migration),
            Box::new(m2025_06_01_000002_create_departments::Migration),
            Box::new(m2025_06_01_000003_create_users::Migration),
            Box::new(m2025_06_01_000004_create_students::Migration),
            Box::new(m2025_06_01_000005_create_attendance::Migration),
        ]
    }
}
