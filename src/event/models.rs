use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Event status. Cancelled events are kept for history but excluded from
/// attendance rosters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum EventStatus {
    Active,
    Cancelled,
}

/// Database model for the events table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventModel {
    pub id: i64,
    pub event_name: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub npo_id: i64,
    pub status: EventStatus,
}

impl EventModel {
    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }

    /// Whether a calendar date falls inside the event's window
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        date >= self.start_time.date_naive() && date <= self.end_time.date_naive()
    }

    /// The event's calendar dates, first to last
    pub fn date_window(&self) -> (NaiveDate, NaiveDate) {
        (self.start_time.date_naive(), self.end_time.date_naive())
    }
}

/// Fields required to create an event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub event_name: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub npo_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_spanning(start: &str, end: &str) -> EventModel {
        EventModel {
            id: 1,
            event_name: "Park cleanup".to_string(),
            description: String::new(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            npo_id: 1,
            status: EventStatus::Active,
        }
    }

    #[test]
    fn test_covers_date_window_bounds() {
        let event = event_spanning("2025-06-01T09:00:00Z", "2025-06-03T17:00:00Z");

        assert!(event.covers_date("2025-06-01".parse().unwrap()));
        assert!(event.covers_date("2025-06-02".parse().unwrap()));
        assert!(event.covers_date("2025-06-03".parse().unwrap()));
        assert!(!event.covers_date("2025-05-31".parse().unwrap()));
        assert!(!event.covers_date("2025-06-04".parse().unwrap()));
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        assert_eq!(
            "Cancelled".parse::<EventStatus>().unwrap(),
            EventStatus::Cancelled
        );
        assert_eq!(EventStatus::Active.to_string(), "Active");
    }
}
