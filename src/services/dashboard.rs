//! Attendance statistics for the dashboard.

use chrono::{Days, NaiveDate};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ServiceResult;
use crate::repositories::{AttendanceRepository, StudentRepository};

/// Days covered by the weekly chart, ending today.
pub const WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_students: u64,
    pub present_today: u64,
    pub absent_today: u64,
    /// Percent of all students marked present today, one decimal place
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeeklyEntry {
    /// Short day label such as `Mon 05`
    pub date: String,
    pub present: u64,
    pub absent: u64,
    pub total: u64,
}

pub fn attendance_percentage(present: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = present as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

pub struct DashboardService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DashboardService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn stats_for(&self, company_id: i32, today: NaiveDate) -> ServiceResult<DashboardStats> {
        let total_students = StudentRepository::new(self.db).count(company_id).await?;
        let counts = AttendanceRepository::new(self.db)
            .counts_on(company_id, today)
            .await?;

        Ok(DashboardStats {
            total_students,
            present_today: counts.present,
            absent_today: counts.absent,
            attendance_percentage: attendance_percentage(counts.present, total_students),
        })
    }

    /// Seven entries, oldest first, the last one being `today`.
    pub async fn weekly_for(&self, company_id: i32, today: NaiveDate) -> ServiceResult<Vec<WeeklyEntry>> {
        let from = today
            .checked_sub_days(Days::new(WEEK_DAYS - 1))
            .unwrap_or(NaiveDate::MIN);
        let days = AttendanceRepository::new(self.db)
            .counts_between(company_id, from, today)
            .await?;

        Ok(days
            .into_iter()
            .map(|(day, counts)| WeeklyEntry {
                date: day.format("%a %d").to_string(),
                present: counts.present,
                absent: counts.absent,
                total: counts.present + counts.absent,
            })
            .collect())
    }
}
