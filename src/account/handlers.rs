use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::AccountService,
    types::{AccountResponse, SigninRequest, SigninResponse, SignupRequest, UpdateProfileRequest},
};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

/// HTTP handler for fetching an account by id
///
/// GET /user/:id
#[instrument(name = "get_account", skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountResponse>, AppError> {
    let service = AccountService::new(
        Arc::clone(&state.account_repository),
        state.token_config.clone(),
    );
    let account = service.get_account(account_id).await?;

    Ok(Json(account.into()))
}

/// HTTP handler for creating a new account
///
/// POST /user/signup
/// Creates the account row and its password hash
#[instrument(name = "signup", skip(state, request))]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    info!(username = %request.username, "New signup");

    let service = AccountService::new(
        Arc::clone(&state.account_repository),
        state.token_config.clone(),
    );
    let account = service.signup(request).await?;

    info!(account_id = account.id, "Account created successfully");
    Ok(Json(account.into()))
}

/// HTTP handler for signing in
///
/// POST /user/signin
/// Returns a JWT token on success
#[instrument(name = "signin", skip(state, request))]
pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, AppError> {
    let service = AccountService::new(
        Arc::clone(&state.account_repository),
        state.token_config.clone(),
    );
    let response = service.signin(request).await?;

    info!(name = %response.name, "Signin successful");
    Ok(Json(response))
}

/// HTTP handler echoing the decoded token claims
///
/// POST /user/signincheck
/// Utility endpoint for clients to probe token validity
#[instrument(name = "signin_check", skip(claims))]
pub async fn signin_check(Extension(claims): Extension<AuthClaims>) -> Json<AuthClaims> {
    Json(claims)
}

/// HTTP handler for updating the caller's profile
///
/// PUT /user/update
#[instrument(name = "update_profile", skip(state, claims, request))]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    info!(account_id = claims.sub, "Updating account profile");

    let service = AccountService::new(
        Arc::clone(&state.account_repository),
        state.token_config.clone(),
    );
    service.update_profile(claims.sub, request).await?;
    let account = service.get_account(claims.sub).await?;

    info!(account_id = claims.sub, "Account updated successfully");
    Ok(Json(account.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/user/:id", get(get_account))
            .route("/user/signup", post(signup))
            .route("/user/signin", post(signin))
            .with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_signup_handler_creates_account() {
        let state = AppStateBuilder::new().build();

        let request = json_request(
            "POST",
            "/user/signup",
            r#"{"username": "jdoe", "email": "jdoe@example.org", "password": "hunter2"}"#,
        );
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let account: AccountResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(account.username, "jdoe");
    }

    #[tokio::test]
    async fn test_signup_handler_missing_field() {
        let state = AppStateBuilder::new().build();

        let request = json_request("POST", "/user/signup", r#"{"username": "jdoe"}"#);
        let response = app(state).oneshot(request).await.unwrap();

        // Missing fields fail JSON extraction
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_signin_handler_roundtrip() {
        let state = AppStateBuilder::new().build();
        let app = app(state);

        let signup = json_request(
            "POST",
            "/user/signup",
            r#"{"username": "jdoe", "email": "jdoe@example.org", "password": "hunter2"}"#,
        );
        app.clone().oneshot(signup).await.unwrap();

        let signin = json_request(
            "POST",
            "/user/signin",
            r#"{"username": "jdoe", "password": "hunter2"}"#,
        );
        let response = app.oneshot(signin).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let signin_response: SigninResponse = serde_json::from_slice(&body).unwrap();
        assert!(!signin_response.token.is_empty());
    }

    #[tokio::test]
    async fn test_signin_handler_wrong_password() {
        let state = AppStateBuilder::new().build();
        let app = app(state);

        let signup = json_request(
            "POST",
            "/user/signup",
            r#"{"username": "jdoe", "email": "jdoe@example.org", "password": "hunter2"}"#,
        );
        app.clone().oneshot(signup).await.unwrap();

        let signin = json_request(
            "POST",
            "/user/signin",
            r#"{"username": "jdoe", "password": "wrong"}"#,
        );
        let response = app.oneshot(signin).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_account_handler_not_found() {
        let state = AppStateBuilder::new().build();

        let request = Request::builder()
            .uri("/user/404")
            .body(Body::empty())
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
