use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{service::EventService, types::{CreateEventRequest, EventResponse}};
use crate::account::models::AccountRole;
use crate::account::AccountService;
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

/// HTTP handler for fetching an event by id
///
/// GET /event/:eid
#[instrument(name = "get_event", skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventResponse>, AppError> {
    let service = EventService::new(Arc::clone(&state.event_repository));
    let event = service.get_event(event_id).await?;

    Ok(Json(event.into()))
}

/// HTTP handler for creating a new event
///
/// POST /event/create
/// Only accounts with the NPO role may create events
#[instrument(name = "create_event", skip(state, claims, request))]
pub async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    info!(npo_id = claims.sub, "Creating new event");

    let accounts = AccountService::new(
        Arc::clone(&state.account_repository),
        state.token_config.clone(),
    );
    accounts
        .verify_role(claims.sub, claims.role, AccountRole::Npo)
        .await?;

    let service = EventService::new(Arc::clone(&state.event_repository));
    let event = service.create_event(claims.sub, request).await?;

    info!(event_id = event.id, "Event created successfully");
    Ok(Json(event.into()))
}

/// HTTP handler for cancelling an event
///
/// POST /event/:eid/cancel
/// Only the owning NPO account may cancel
#[instrument(name = "cancel_event", skip(state, claims))]
pub async fn cancel_event(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventResponse>, AppError> {
    info!(event_id, caller = claims.sub, "Cancelling event");

    let accounts = AccountService::new(
        Arc::clone(&state.account_repository),
        state.token_config.clone(),
    );
    accounts
        .verify_role(claims.sub, claims.role, AccountRole::Npo)
        .await?;

    let service = EventService::new(Arc::clone(&state.event_repository));
    let event = service.cancel_event(event_id, claims.sub).await?;

    Ok(Json(event.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::models::{NewAccount, ProfileUpdate};
    use crate::account::repository::{AccountRepository, InMemoryAccountRepository};
    use crate::auth::jwt_auth;
    use crate::event::models::EventStatus;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        let protected = Router::new()
            .route("/event/create", post(create_event))
            .route("/event/:eid/cancel", post(cancel_event))
            .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth));

        Router::new()
            .route("/event/:eid", get(get_event))
            .merge(protected)
            .with_state(state)
    }

    /// Creates an account with the given role and returns (id, bearer token)
    async fn account_with_role(state: &AppState, username: &str, role: AccountRole) -> (i64, String) {
        let repo = &state.account_repository;
        let account = repo
            .create_account(
                &NewAccount {
                    username: username.to_string(),
                    email: format!("{}@example.org", username),
                },
                "hash",
            )
            .await
            .unwrap();
        repo.update_profile(
            account.id,
            &ProfileUpdate {
                role,
                name: username.to_string(),
                phone: None,
                description: None,
            },
        )
        .await
        .unwrap();

        let token = state
            .token_config
            .create_token(account.id, username, role)
            .unwrap();
        (account.id, token)
    }

    fn create_event_body() -> String {
        r#"{
            "event_name": "Park cleanup",
            "description": "Bring gloves",
            "start_time": "2025-06-01T09:00:00Z",
            "end_time": "2025-06-03T17:00:00Z"
        }"#
        .to_string()
    }

    #[tokio::test]
    async fn test_npo_can_create_event() {
        let state = AppStateBuilder::new()
            .with_account_repository(Arc::new(InMemoryAccountRepository::new()))
            .build();
        let (npo_id, token) = account_with_role(&state, "org", AccountRole::Npo).await;

        let request = Request::builder()
            .method("POST")
            .uri("/event/create")
            .header("content-type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::from(create_event_body()))
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let event: EventResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(event.npo_id, npo_id);
        assert_eq!(event.status, EventStatus::Active);
    }

    #[tokio::test]
    async fn test_volunteer_cannot_create_event() {
        let state = AppStateBuilder::new().build();
        let (_id, token) = account_with_role(&state, "vol", AccountRole::Volunteer).await;

        let request = Request::builder()
            .method("POST")
            .uri("/event/create")
            .header("content-type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::from(create_event_body()))
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_event_requires_token() {
        let state = AppStateBuilder::new().build();

        let request = Request::builder()
            .method("POST")
            .uri("/event/create")
            .header("content-type", "application/json")
            .body(Body::from(create_event_body()))
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_event_is_public() {
        let state = AppStateBuilder::new().build();
        let (_npo_id, token) = account_with_role(&state, "org", AccountRole::Npo).await;
        let app = app(state);

        let create = Request::builder()
            .method("POST")
            .uri("/event/create")
            .header("content-type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::from(create_event_body()))
            .unwrap();
        let response = app.clone().oneshot(create).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: EventResponse = serde_json::from_slice(&body).unwrap();

        let fetch = Request::builder()
            .uri(format!("/event/{}", created.id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(fetch).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cancel_by_other_npo_forbidden() {
        let state = AppStateBuilder::new().build();
        let (_owner_id, owner_token) = account_with_role(&state, "org", AccountRole::Npo).await;
        let (_other_id, other_token) = account_with_role(&state, "rival", AccountRole::Npo).await;
        let app = app(state);

        let create = Request::builder()
            .method("POST")
            .uri("/event/create")
            .header("content-type", "application/json")
            .header("Authorization", format!("Bearer {}", owner_token))
            .body(Body::from(create_event_body()))
            .unwrap();
        let response = app.clone().oneshot(create).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: EventResponse = serde_json::from_slice(&body).unwrap();

        let cancel = Request::builder()
            .method("POST")
            .uri(format!("/event/{}/cancel", created.id))
            .header("Authorization", format!("Bearer {}", other_token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(cancel).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
