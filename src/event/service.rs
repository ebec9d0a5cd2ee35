use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{EventModel, EventStatus, NewEvent},
    repository::EventRepository,
    types::CreateEventRequest,
};
use crate::shared::AppError;

/// Service for handling event business logic. Role gating happens in the
/// handlers via AccountService; this service owns the event invariants.
pub struct EventService {
    repository: Arc<dyn EventRepository + Send + Sync>,
}

impl EventService {
    pub fn new(repository: Arc<dyn EventRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Creates a new event owned by the given NPO account
    #[instrument(skip(self, request))]
    pub async fn create_event(
        &self,
        npo_id: i64,
        request: CreateEventRequest,
    ) -> Result<EventModel, AppError> {
        info!(npo_id, event_name = %request.event_name, "Creating event");

        if request.event_name.is_empty() {
            return Err(AppError::BadRequest("Event name is required".to_string()));
        }
        if request.start_time > request.end_time {
            warn!(npo_id, "Event window ends before it starts");
            return Err(AppError::BadRequest(
                "Event must not end before it starts".to_string(),
            ));
        }

        let new_event = NewEvent {
            event_name: request.event_name,
            description: request.description,
            start_time: request.start_time,
            end_time: request.end_time,
            npo_id,
        };
        let event = self.repository.create_event(&new_event).await?;

        info!(event_id = event.id, "Event created successfully");
        Ok(event)
    }

    /// Fetches an event by id
    #[instrument(skip(self))]
    pub async fn get_event(&self, event_id: i64) -> Result<EventModel, AppError> {
        self.repository
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    /// Cancels an event. Only the owning account may cancel.
    #[instrument(skip(self))]
    pub async fn cancel_event(&self, event_id: i64, caller_id: i64) -> Result<EventModel, AppError> {
        info!(event_id, caller_id, "Cancelling event");

        let event = self.get_event(event_id).await?;
        if event.npo_id != caller_id {
            warn!(event_id, caller_id, owner = event.npo_id, "Cancel attempt by non-owner");
            return Err(AppError::Forbidden(
                "Only the owning account may cancel an event".to_string(),
            ));
        }

        self.repository
            .set_status(event_id, EventStatus::Cancelled)
            .await?;

        info!(event_id, "Event cancelled successfully");
        self.get_event(event_id).await
    }
}
