// Library crate for the volunteer coordination server
// This file exposes the public API for integration tests

pub mod account;
pub mod attendance;
pub mod auth;
pub mod event;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use account::{models::AccountRole, repository::AccountRepository, AccountService};
pub use attendance::{repository::AttendanceRepository, AttendanceService};
pub use auth::{jwt_auth, AuthClaims, TokenConfig, REFRESH_TOKEN_HEADER};
pub use event::{repository::EventRepository, EventService};
pub use shared::{AppError, AppState};

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

/// Builds the full application router. Routes behind the JWT middleware
/// carry the caller's claims in request extensions.
pub fn router(app_state: AppState) -> Router {
    let protected = Router::new()
        .route("/user/signincheck", post(account::signin_check))
        .route("/user/update", put(account::update_profile))
        .route("/user/event/:eid", get(attendance::my_event_redirect))
        .route(
            "/user/event/:eid/attendance",
            get(attendance::my_event_attendance),
        )
        .route("/event/create", post(event::create_event))
        .route("/event/:eid/cancel", post(event::cancel_event))
        .route(
            "/event/:eid/enrollment/modify",
            post(attendance::modify_enrollment),
        )
        .route("/event/:eid/attendance", get(attendance::event_attendance))
        .route(
            "/event/:eid/attendance/modify",
            post(attendance::modify_attendance),
        )
        .route(
            "/event/:eid/attendance/:date",
            get(attendance::daily_roster),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::jwt_auth,
        ));

    Router::new()
        .route("/", get(|| async { "Volunteer coordination server" }))
        .route("/user/:id", get(account::get_account))
        .route("/user/signup", post(account::signup))
        .route("/user/signin", post(account::signin))
        .route("/event/:eid", get(event::get_event))
        .merge(protected)
        .with_state(app_state)
}
