//! Attendance repository

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::models::{Attendance, AttendanceStatus, attendance};

/// Number of records returned by [`AttendanceRepository::history`].
pub const HISTORY_LIMIT: u64 = 200;

/// Rows per INSERT statement; keeps bound parameters under backend limits.
pub const INSERT_CHUNK_SIZE: usize = 500;

/// Present/absent tallies for one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCounts {
    pub present: u64,
    pub absent: u64,
}

impl DayCounts {
    fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
    }
}

/// Repository for attendance records of a single company
pub struct AttendanceRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AttendanceRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Replace every record of the company for `date` with `roster`.
    ///
    /// Not atomic on its own; call it on a transaction. Returns the number of
    /// records removed and the inserted rows.
    pub async fn replace_for_date(
        &self,
        company_id: i32,
        date: NaiveDate,
        roster: &[(i32, AttendanceStatus)],
    ) -> Result<(u64, Vec<attendance::Model>), DbErr> {
        let removed = Attendance::delete_many()
            .filter(attendance::Column::CompanyId.eq(company_id))
            .filter(attendance::Column::Date.eq(date))
            .exec(self.db)
            .await?
            .rows_affected;

        if roster.is_empty() {
            return Ok((removed, Vec::new()));
        }

        let now = Utc::now();
        for chunk in roster.chunks(INSERT_CHUNK_SIZE) {
            let rows = chunk.iter().map(|(student_id, status)| attendance::ActiveModel {
                student_id: Set(*student_id),
                date: Set(date),
                status: Set(*status),
                company_id: Set(company_id),
                created_at: Set(now.into()),
                ..Default::default()
            });
            Attendance::insert_many(rows).exec(self.db).await?;
        }

        let inserted = Attendance::find()
            .filter(attendance::Column::CompanyId.eq(company_id))
            .filter(attendance::Column::Date.eq(date))
            .order_by_asc(attendance::Column::Id)
            .all(self.db)
            .await?;

        Ok((removed, inserted))
    }

    /// Records of the company, optionally for one date, newest date first.
    pub async fn list(
        &self,
        company_id: i32,
        date: Option<NaiveDate>,
    ) -> Result<Vec<attendance::Model>, DbErr> {
        let mut query = Attendance::find().filter(attendance::Column::CompanyId.eq(company_id));
        if let Some(date) = date {
            query = query.filter(attendance::Column::Date.eq(date));
        }
        query
            .order_by_desc(attendance::Column::Date)
            .order_by_asc(attendance::Column::Id)
            .all(self.db)
            .await
    }

    /// The most recent [`HISTORY_LIMIT`] records of the company, newest date
    /// first, ordered within a day like [`Self::list`].
    pub async fn history(&self, company_id: i32) -> Result<Vec<attendance::Model>, DbErr> {
        Attendance::find()
            .filter(attendance::Column::CompanyId.eq(company_id))
            .order_by_desc(attendance::Column::Date)
            .order_by_asc(attendance::Column::Id)
            .limit(HISTORY_LIMIT)
            .all(self.db)
            .await
    }

    /// Present/absent counts for each day in `from..=to`, in date order.
    /// Days without records are included with zero counts.
    pub async fn counts_between(
        &self,
        company_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(NaiveDate, DayCounts)>, DbErr> {
        let rows: Vec<(NaiveDate, AttendanceStatus)> = Attendance::find()
            .select_only()
            .column(attendance::Column::Date)
            .column(attendance::Column::Status)
            .filter(attendance::Column::CompanyId.eq(company_id))
            .filter(attendance::Column::Date.between(from, to))
            .into_tuple()
            .all(self.db)
            .await?;

        let mut days: Vec<(NaiveDate, DayCounts)> = from
            .iter_days()
            .take_while(|day| *day <= to)
            .map(|day| (day, DayCounts::default()))
            .collect();

        for (date, status) in rows {
            if let Some((_, counts)) = days.iter_mut().find(|(day, _)| *day == date) {
                counts.add(status);
            }
        }

        Ok(days)
    }

    pub async fn counts_on(&self, company_id: i32, date: NaiveDate) -> Result<DayCounts, DbErr> {
        let days = self.counts_between(company_id, date, date).await?;
        Ok(days.first().map(|(_, counts)| *counts).unwrap_or_default())
    }
}
