use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::models::AttendanceStatus;

/// Request payload for enrolling or unenrolling a volunteer
#[derive(Debug, Deserialize)]
pub struct ModifyEnrollmentRequest {
    pub volunteer_id: i64,
    pub enrolled: bool,
}

/// Request payload for marking a volunteer present or absent on a date
#[derive(Debug, Deserialize)]
pub struct ModifyAttendanceRequest {
    pub volunteer_id: i64,
    pub date: NaiveDate,
    pub present: bool,
}

/// Query parameters for the NPO attendance range view
#[derive(Debug, Deserialize)]
pub struct AttendanceRangeQuery {
    pub volunteer_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One day of a volunteer's attendance series
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AttendanceDay {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// One enrolled volunteer's status in a daily roster
#[derive(Debug, Serialize, Deserialize)]
pub struct RosterEntry {
    pub volunteer_id: i64,
    pub volunteer_name: String,
    pub status: AttendanceStatus,
}
