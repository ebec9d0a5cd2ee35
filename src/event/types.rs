use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{EventModel, EventStatus};

/// Request payload for creating a new event
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub event_name: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Public view of an event
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: i64,
    pub event_name: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub npo_id: i64,
    pub status: EventStatus,
}

impl From<EventModel> for EventResponse {
    fn from(model: EventModel) -> Self {
        Self {
            id: model.id,
            event_name: model.event_name,
            description: model.description,
            start_time: model.start_time,
            end_time: model.end_time,
            npo_id: model.npo_id,
            status: model.status,
        }
    }
}
