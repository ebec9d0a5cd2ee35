use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Presence on a given date. Derived from whether an attendance row exists,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// Database model for the event_attendance table. A row marks a volunteer
/// present at an event on a date; its absence marks them absent. A record
/// always implies an enrollment in event_volunteers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub event_id: i64,
    pub volunteer_id: i64,
    pub attendance_date: NaiveDate,
}
