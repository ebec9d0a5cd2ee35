use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::AttendanceService,
    types::{AttendanceDay, AttendanceRangeQuery, ModifyAttendanceRequest, ModifyEnrollmentRequest},
};
use crate::account::models::AccountRole;
use crate::account::AccountService;
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

fn attendance_service(state: &AppState) -> AttendanceService {
    AttendanceService::new(
        Arc::clone(&state.attendance_repository),
        Arc::clone(&state.event_repository),
        Arc::clone(&state.account_repository),
    )
}

fn account_service(state: &AppState) -> AccountService {
    AccountService::new(
        Arc::clone(&state.account_repository),
        state.token_config.clone(),
    )
}

fn series_path(event_id: i64) -> String {
    format!("/user/event/{}/attendance", event_id)
}

/// HTTP handler for enrolling or unenrolling a volunteer
///
/// POST /event/:eid/enrollment/modify
#[instrument(name = "modify_enrollment", skip(state, request))]
pub async fn modify_enrollment(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(request): Json<ModifyEnrollmentRequest>,
) -> Result<StatusCode, AppError> {
    info!(event_id, volunteer_id = request.volunteer_id, "Modifying enrollment");

    attendance_service(&state)
        .modify_enrollment(event_id, request.volunteer_id, request.enrolled)
        .await?;

    Ok(StatusCode::OK)
}

/// HTTP handler for marking a volunteer present or absent on a date
///
/// POST /event/:eid/attendance/modify
/// NPO role required; the volunteer must be enrolled
#[instrument(name = "modify_attendance", skip(state, claims, request))]
pub async fn modify_attendance(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(event_id): Path<i64>,
    Json(request): Json<ModifyAttendanceRequest>,
) -> Result<StatusCode, AppError> {
    info!(
        event_id,
        volunteer_id = request.volunteer_id,
        "Modifying attendance"
    );

    account_service(&state)
        .verify_role(claims.sub, claims.role, AccountRole::Npo)
        .await?;

    attendance_service(&state)
        .modify_attendance(event_id, request.volunteer_id, request.date, request.present)
        .await?;

    Ok(StatusCode::OK)
}

/// HTTP handler for the attendance range view
///
/// GET /event/:eid/attendance?volunteer_id=&start_date=&end_date=
/// NPO accounts get the records; volunteers are redirected to their own
/// per-date series view.
#[instrument(name = "event_attendance", skip(state, claims, query))]
pub async fn event_attendance(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(event_id): Path<i64>,
    query: Option<Query<AttendanceRangeQuery>>,
) -> Result<Response, AppError> {
    match claims.role {
        AccountRole::Npo => {
            account_service(&state)
                .verify_role(claims.sub, claims.role, AccountRole::Npo)
                .await?;

            let Query(query) = query.ok_or_else(|| {
                AppError::BadRequest(
                    "volunteer_id, start_date and end_date are required".to_string(),
                )
            })?;

            let records = attendance_service(&state)
                .attendance_in_range(event_id, query.volunteer_id, query.start_date, query.end_date)
                .await?;
            Ok(Json(records).into_response())
        }
        AccountRole::Volunteer => {
            account_service(&state)
                .verify_role(claims.sub, claims.role, AccountRole::Volunteer)
                .await?;
            Ok(Redirect::to(&series_path(event_id)).into_response())
        }
    }
}

/// HTTP handler for the daily attendance roster
///
/// GET /event/:eid/attendance/:date
/// Lists every enrolled volunteer with Present/Absent status for the date,
/// for rendering an attendance checklist. Volunteers are redirected to
/// their own series view.
#[instrument(name = "daily_roster", skip(state, claims))]
pub async fn daily_roster(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path((event_id, date)): Path<(i64, NaiveDate)>,
) -> Result<Response, AppError> {
    match claims.role {
        AccountRole::Npo => {
            account_service(&state)
                .verify_role(claims.sub, claims.role, AccountRole::Npo)
                .await?;

            let roster = attendance_service(&state)
                .daily_roster(event_id, date, claims.sub)
                .await?;
            Ok(Json(roster).into_response())
        }
        AccountRole::Volunteer => {
            account_service(&state)
                .verify_role(claims.sub, claims.role, AccountRole::Volunteer)
                .await?;
            Ok(Redirect::to(&series_path(event_id)).into_response())
        }
    }
}

/// HTTP handler for a volunteer's own per-date attendance series
///
/// GET /user/event/:eid/attendance
#[instrument(name = "my_event_attendance", skip(state, claims))]
pub async fn my_event_attendance(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<AttendanceDay>>, AppError> {
    let series = attendance_service(&state)
        .volunteer_series(event_id, claims.sub)
        .await?;

    Ok(Json(series))
}

/// HTTP handler redirecting an event link to its attendance view
///
/// GET /user/event/:eid
#[instrument(name = "my_event_redirect")]
pub async fn my_event_redirect(Path(event_id): Path<i64>) -> Redirect {
    Redirect::to(&series_path(event_id))
}
