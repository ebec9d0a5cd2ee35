use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{AttendanceRecord, AttendanceStatus},
    repository::AttendanceRepository,
    types::{AttendanceDay, RosterEntry},
};
use crate::account::repository::AccountRepository;
use crate::event::models::EventModel;
use crate::event::repository::EventRepository;
use crate::shared::AppError;

/// Service for enrollment and attendance business logic
pub struct AttendanceService {
    attendance_repository: Arc<dyn AttendanceRepository + Send + Sync>,
    event_repository: Arc<dyn EventRepository + Send + Sync>,
    account_repository: Arc<dyn AccountRepository + Send + Sync>,
}

impl AttendanceService {
    pub fn new(
        attendance_repository: Arc<dyn AttendanceRepository + Send + Sync>,
        event_repository: Arc<dyn EventRepository + Send + Sync>,
        account_repository: Arc<dyn AccountRepository + Send + Sync>,
    ) -> Self {
        Self {
            attendance_repository,
            event_repository,
            account_repository,
        }
    }

    async fn get_event(&self, event_id: i64) -> Result<EventModel, AppError> {
        self.event_repository
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    /// Enrolls or unenrolls a volunteer. Unenrolling drops the volunteer's
    /// attendance rows with it.
    #[instrument(skip(self))]
    pub async fn modify_enrollment(
        &self,
        event_id: i64,
        volunteer_id: i64,
        enrolled: bool,
    ) -> Result<(), AppError> {
        info!(event_id, volunteer_id, enrolled, "Modifying enrollment");

        self.get_event(event_id).await?;
        self.attendance_repository
            .set_enrollment(event_id, volunteer_id, enrolled)
            .await?;

        info!(event_id, volunteer_id, "Enrollment updated successfully");
        Ok(())
    }

    /// Marks a volunteer present or absent on a date. The volunteer must be
    /// enrolled in the event.
    #[instrument(skip(self))]
    pub async fn modify_attendance(
        &self,
        event_id: i64,
        volunteer_id: i64,
        date: NaiveDate,
        present: bool,
    ) -> Result<(), AppError> {
        info!(event_id, volunteer_id, %date, present, "Modifying attendance");

        self.get_event(event_id).await?;
        if !self
            .attendance_repository
            .is_enrolled(event_id, volunteer_id)
            .await?
        {
            warn!(event_id, volunteer_id, "Attendance change for unenrolled volunteer");
            return Err(AppError::Forbidden(
                "Volunteer not enrolled in this event".to_string(),
            ));
        }

        self.attendance_repository
            .set_attendance(event_id, volunteer_id, date, present)
            .await?;

        info!(event_id, volunteer_id, "Attendance updated successfully");
        Ok(())
    }

    /// A volunteer's own day-by-day attendance across the event window.
    /// Covers every date from the event's first day to its last, marking
    /// Present exactly on recorded dates.
    #[instrument(skip(self))]
    pub async fn volunteer_series(
        &self,
        event_id: i64,
        volunteer_id: i64,
    ) -> Result<Vec<AttendanceDay>, AppError> {
        let event = self.get_event(event_id).await?;

        if !self
            .attendance_repository
            .is_enrolled(event_id, volunteer_id)
            .await?
        {
            warn!(event_id, volunteer_id, "Series request from unenrolled volunteer");
            return Err(AppError::Forbidden(
                "You are not authorized to view this event".to_string(),
            ));
        }

        let recorded: HashSet<NaiveDate> = self
            .attendance_repository
            .attendance_dates(event_id, volunteer_id)
            .await?
            .into_iter()
            .collect();

        let (first, last) = event.date_window();
        let mut series = Vec::new();
        let mut day = first;
        while day <= last {
            let status = if recorded.contains(&day) {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            series.push(AttendanceDay { date: day, status });
            day = day.succ_opt().ok_or(AppError::Internal)?;
        }

        Ok(series)
    }

    /// Attendance records for one volunteer between two dates, for the NPO
    /// range view
    #[instrument(skip(self))]
    pub async fn attendance_in_range(
        &self,
        event_id: i64,
        volunteer_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        self.get_event(event_id).await?;
        self.attendance_repository
            .attendance_in_range(event_id, volunteer_id, start_date, end_date)
            .await
    }

    /// Every enrolled volunteer's status on one date, for rendering an
    /// attendance checklist. The date must fall inside the event window, the
    /// event must not be cancelled, and the event must belong to the caller.
    #[instrument(skip(self))]
    pub async fn daily_roster(
        &self,
        event_id: i64,
        date: NaiveDate,
        caller_id: i64,
    ) -> Result<Vec<RosterEntry>, AppError> {
        let event = self.get_event(event_id).await?;

        if event.npo_id != caller_id {
            warn!(event_id, caller_id, "Roster request by non-owner");
            return Err(AppError::Forbidden(
                "You are not authorized to view attendance for this event".to_string(),
            ));
        }
        if event.is_cancelled() {
            warn!(event_id, "Roster request for cancelled event");
            return Err(AppError::Forbidden("Event is cancelled".to_string()));
        }
        if !event.covers_date(date) {
            warn!(event_id, %date, "Roster date outside event window");
            return Err(AppError::Forbidden("Invalid event date".to_string()));
        }

        let enrolled = self
            .attendance_repository
            .enrolled_volunteers(event_id)
            .await?;
        let present: HashSet<i64> = self
            .attendance_repository
            .present_volunteers(event_id, date)
            .await?
            .into_iter()
            .collect();

        let mut roster = Vec::with_capacity(enrolled.len());
        for volunteer_id in enrolled {
            let volunteer_name = self
                .account_repository
                .get_account(volunteer_id)
                .await?
                .map(|a| a.display_name().to_string())
                .unwrap_or_else(|| volunteer_id.to_string());

            let status = if present.contains(&volunteer_id) {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            roster.push(RosterEntry {
                volunteer_id,
                volunteer_name,
                status,
            });
        }

        Ok(roster)
    }
}
