use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use std::collections::BTreeSet;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::AttendanceRecord;
use crate::shared::AppError;

/// Trait for enrollment and attendance repository operations, covering the
/// event_volunteers and event_attendance tables.
#[async_trait]
pub trait AttendanceRepository {
    async fn set_enrollment(
        &self,
        event_id: i64,
        volunteer_id: i64,
        enrolled: bool,
    ) -> Result<(), AppError>;
    async fn is_enrolled(&self, event_id: i64, volunteer_id: i64) -> Result<bool, AppError>;
    async fn enrolled_volunteers(&self, event_id: i64) -> Result<Vec<i64>, AppError>;
    async fn set_attendance(
        &self,
        event_id: i64,
        volunteer_id: i64,
        date: NaiveDate,
        present: bool,
    ) -> Result<(), AppError>;
    async fn attendance_dates(
        &self,
        event_id: i64,
        volunteer_id: i64,
    ) -> Result<Vec<NaiveDate>, AppError>;
    async fn attendance_in_range(
        &self,
        event_id: i64,
        volunteer_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError>;
    async fn present_volunteers(
        &self,
        event_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<i64>, AppError>;
}

/// In-memory implementation of AttendanceRepository for development and testing
pub struct InMemoryAttendanceRepository {
    state: Mutex<InMemoryState>,
}

struct InMemoryState {
    enrollments: BTreeSet<(i64, i64)>,
    attendance: BTreeSet<(i64, i64, NaiveDate)>,
}

impl Default for InMemoryAttendanceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAttendanceRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryState {
                enrollments: BTreeSet::new(),
                attendance: BTreeSet::new(),
            }),
        }
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendanceRepository {
    #[instrument(skip(self))]
    async fn set_enrollment(
        &self,
        event_id: i64,
        volunteer_id: i64,
        enrolled: bool,
    ) -> Result<(), AppError> {
        debug!(event_id, volunteer_id, enrolled, "Setting enrollment in memory");

        let mut state = self.state.lock().unwrap();
        if enrolled {
            state.enrollments.insert((event_id, volunteer_id));
        } else {
            state.enrollments.remove(&(event_id, volunteer_id));
            // Dropping an enrollment drops its attendance rows, as the
            // database schema does via ON DELETE CASCADE
            state
                .attendance
                .retain(|&(e, v, _)| !(e == event_id && v == volunteer_id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn is_enrolled(&self, event_id: i64, volunteer_id: i64) -> Result<bool, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.enrollments.contains(&(event_id, volunteer_id)))
    }

    #[instrument(skip(self))]
    async fn enrolled_volunteers(&self, event_id: i64) -> Result<Vec<i64>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .enrollments
            .iter()
            .filter(|&&(e, _)| e == event_id)
            .map(|&(_, v)| v)
            .collect())
    }

    #[instrument(skip(self))]
    async fn set_attendance(
        &self,
        event_id: i64,
        volunteer_id: i64,
        date: NaiveDate,
        present: bool,
    ) -> Result<(), AppError> {
        debug!(event_id, volunteer_id, %date, present, "Setting attendance in memory");

        let mut state = self.state.lock().unwrap();
        if present {
            state.attendance.insert((event_id, volunteer_id, date));
        } else {
            state.attendance.remove(&(event_id, volunteer_id, date));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn attendance_dates(
        &self,
        event_id: i64,
        volunteer_id: i64,
    ) -> Result<Vec<NaiveDate>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .attendance
            .iter()
            .filter(|&&(e, v, _)| e == event_id && v == volunteer_id)
            .map(|&(_, _, d)| d)
            .collect())
    }

    #[instrument(skip(self))]
    async fn attendance_in_range(
        &self,
        event_id: i64,
        volunteer_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .attendance
            .iter()
            .filter(|&&(e, v, d)| {
                e == event_id && v == volunteer_id && d >= start_date && d <= end_date
            })
            .map(|&(e, v, d)| AttendanceRecord {
                event_id: e,
                volunteer_id: v,
                attendance_date: d,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn present_volunteers(
        &self,
        event_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<i64>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .attendance
            .iter()
            .filter(|&&(e, _, d)| e == event_id && d == date)
            .map(|&(_, v, _)| v)
            .collect())
    }
}

/// PostgreSQL implementation of attendance repository
pub struct PostgresAttendanceRepository {
    pool: PgPool,
}

impl PostgresAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepository {
    #[instrument(skip(self))]
    async fn set_enrollment(
        &self,
        event_id: i64,
        volunteer_id: i64,
        enrolled: bool,
    ) -> Result<(), AppError> {
        debug!(event_id, volunteer_id, enrolled, "Setting enrollment in database");

        let query = if enrolled {
            sqlx::query(
                "INSERT INTO event_volunteers (event_id, volunteer_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
        } else {
            sqlx::query("DELETE FROM event_volunteers WHERE event_id = $1 AND volunteer_id = $2")
        };

        query
            .bind(event_id)
            .bind(volunteer_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, event_id, volunteer_id, "Failed to set enrollment");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn is_enrolled(&self, event_id: i64, volunteer_id: i64) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT 1 AS one FROM event_volunteers WHERE event_id = $1 AND volunteer_id = $2 \
             LIMIT 1",
        )
        .bind(event_id)
        .bind(volunteer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, event_id, volunteer_id, "Failed to check enrollment");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.is_some())
    }

    #[instrument(skip(self))]
    async fn enrolled_volunteers(&self, event_id: i64) -> Result<Vec<i64>, AppError> {
        let rows = sqlx::query(
            "SELECT volunteer_id FROM event_volunteers WHERE event_id = $1 ORDER BY volunteer_id",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, event_id, "Failed to list enrolled volunteers");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(|row| row.get("volunteer_id")).collect())
    }

    #[instrument(skip(self))]
    async fn set_attendance(
        &self,
        event_id: i64,
        volunteer_id: i64,
        date: NaiveDate,
        present: bool,
    ) -> Result<(), AppError> {
        debug!(event_id, volunteer_id, %date, present, "Setting attendance in database");

        let query = if present {
            sqlx::query(
                "INSERT INTO event_attendance (event_id, volunteer_id, attendance_date) \
                 VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            )
        } else {
            sqlx::query(
                "DELETE FROM event_attendance \
                 WHERE event_id = $1 AND volunteer_id = $2 AND attendance_date = $3",
            )
        };

        query
            .bind(event_id)
            .bind(volunteer_id)
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, event_id, volunteer_id, "Failed to set attendance");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn attendance_dates(
        &self,
        event_id: i64,
        volunteer_id: i64,
    ) -> Result<Vec<NaiveDate>, AppError> {
        let rows = sqlx::query(
            "SELECT attendance_date FROM event_attendance \
             WHERE event_id = $1 AND volunteer_id = $2 ORDER BY attendance_date",
        )
        .bind(event_id)
        .bind(volunteer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, event_id, volunteer_id, "Failed to fetch attendance dates");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(|row| row.get("attendance_date")).collect())
    }

    #[instrument(skip(self))]
    async fn attendance_in_range(
        &self,
        event_id: i64,
        volunteer_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let rows = sqlx::query(
            "SELECT event_id, volunteer_id, attendance_date FROM event_attendance \
             WHERE event_id = $1 AND volunteer_id = $2 \
             AND attendance_date >= $3 AND attendance_date <= $4 \
             ORDER BY attendance_date",
        )
        .bind(event_id)
        .bind(volunteer_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, event_id, volunteer_id, "Failed to fetch attendance range");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows
            .iter()
            .map(|row| AttendanceRecord {
                event_id: row.get("event_id"),
                volunteer_id: row.get("volunteer_id"),
                attendance_date: row.get("attendance_date"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn present_volunteers(
        &self,
        event_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<i64>, AppError> {
        let rows = sqlx::query(
            "SELECT volunteer_id FROM event_attendance \
             WHERE event_id = $1 AND attendance_date = $2 ORDER BY volunteer_id",
        )
        .bind(event_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, event_id, %date, "Failed to fetch present volunteers");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(|row| row.get("volunteer_id")).collect())
    }
}
