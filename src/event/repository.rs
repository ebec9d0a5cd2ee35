use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{EventModel, EventStatus, NewEvent};
use crate::shared::AppError;

/// Trait for event repository operations
#[async_trait]
pub trait EventRepository {
    async fn create_event(&self, new_event: &NewEvent) -> Result<EventModel, AppError>;
    async fn get_event(&self, event_id: i64) -> Result<Option<EventModel>, AppError>;
    async fn set_status(&self, event_id: i64, status: EventStatus) -> Result<(), AppError>;
}

/// In-memory implementation of EventRepository for development and testing
pub struct InMemoryEventRepository {
    state: Mutex<InMemoryState>,
}

struct InMemoryState {
    events: HashMap<i64, EventModel>,
    next_id: i64,
}

impl Default for InMemoryEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryState {
                events: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    #[instrument(skip(self, new_event))]
    async fn create_event(&self, new_event: &NewEvent) -> Result<EventModel, AppError> {
        debug!(event_name = %new_event.event_name, "Creating event in memory");

        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;

        let event = EventModel {
            id,
            event_name: new_event.event_name.clone(),
            description: new_event.description.clone(),
            start_time: new_event.start_time,
            end_time: new_event.end_time,
            npo_id: new_event.npo_id,
            status: EventStatus::Active,
        };
        state.events.insert(id, event.clone());

        debug!(event_id = id, "Event created successfully in memory");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn get_event(&self, event_id: i64) -> Result<Option<EventModel>, AppError> {
        debug!(event_id, "Fetching event from memory");

        let state = self.state.lock().unwrap();
        Ok(state.events.get(&event_id).cloned())
    }

    #[instrument(skip(self))]
    async fn set_status(&self, event_id: i64, status: EventStatus) -> Result<(), AppError> {
        debug!(event_id, %status, "Setting event status in memory");

        let mut state = self.state.lock().unwrap();
        let event = state.events.get_mut(&event_id).ok_or_else(|| {
            warn!(event_id, "Event not found for status change");
            AppError::NotFound("Event not found".to_string())
        })?;
        event.status = status;

        Ok(())
    }
}

/// PostgreSQL implementation of event repository
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_event_row(row: &PgRow) -> Result<EventModel, AppError> {
        let raw_status: String = row.get("status");
        let status = raw_status.parse::<EventStatus>().map_err(|_| {
            warn!(status = %raw_status, "Unknown status in events row");
            AppError::DatabaseError(format!("Unknown event status: {}", raw_status))
        })?;

        Ok(EventModel {
            id: row.get("id"),
            event_name: row.get("event_name"),
            description: row.get("description"),
            start_time: row.get("start_time"),
            end_time: row.get("end_time"),
            npo_id: row.get("npo_id"),
            status,
        })
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    #[instrument(skip(self, new_event))]
    async fn create_event(&self, new_event: &NewEvent) -> Result<EventModel, AppError> {
        debug!(event_name = %new_event.event_name, "Creating event in database");

        let row = sqlx::query(
            "INSERT INTO events (event_name, description, start_time, end_time, npo_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, event_name, description, start_time, end_time, npo_id, status",
        )
        .bind(&new_event.event_name)
        .bind(&new_event.description)
        .bind(new_event.start_time)
        .bind(new_event.end_time)
        .bind(new_event.npo_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create event in database");
            AppError::DatabaseError(e.to_string())
        })?;

        let event = Self::map_event_row(&row)?;
        debug!(event_id = event.id, "Event created successfully in database");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn get_event(&self, event_id: i64) -> Result<Option<EventModel>, AppError> {
        debug!(event_id, "Fetching event from database");

        let row = sqlx::query(
            "SELECT id, event_name, description, start_time, end_time, npo_id, status \
             FROM events WHERE id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, event_id, "Failed to fetch event from database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.map(|row| Self::map_event_row(&row)).transpose()
    }

    #[instrument(skip(self))]
    async fn set_status(&self, event_id: i64, status: EventStatus) -> Result<(), AppError> {
        debug!(event_id, %status, "Setting event status in database");

        let result = sqlx::query("UPDATE events SET status = $2 WHERE id = $1")
            .bind(event_id)
            .bind(status.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, event_id, "Failed to set event status");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(event_id, "Event not found for status change");
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        Ok(())
    }
}
