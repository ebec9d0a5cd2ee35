use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::shared::{AppError, AppState};

/// Response header carrying a reissued token when the presented one has
/// passed the midpoint of its validity window
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// JWT authentication middleware - validates Authorization Bearer header and adds AuthClaims to request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), auth::jwt_auth))
/// Handlers can then extract Extension(claims): Extension<AuthClaims>.
///
/// Implements sliding expiry: once less than half of the token's validity
/// window remains, a replacement token with a fresh issued-at/expiry pair is
/// attached to the response in the `x-refresh-token` header.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    info!(
        "JWT authentication middleware triggered for request {}",
        req.uri()
    );

    // Extract token from Authorization Bearer header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    // Extract Bearer token
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    // Validate token, log error if it fails
    let claims = match state.token_config.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(AppError::Unauthorized("Invalid jwt token".to_string()));
        }
    };

    info!(
        sub = claims.sub,
        role = %claims.role,
        "Authentication successful, adding claims to request"
    );

    // Add claims to request extensions for handlers to use
    req.extensions_mut().insert(claims.clone());

    // Continue to next middleware/handler
    let mut response = next.run(req).await;

    // Sliding refresh: reissue once the token is in the second half of its window
    if claims.past_refresh_midpoint(Utc::now().timestamp()) {
        let refreshed = state.token_config.refresh_token(&claims)?;
        let header_value = HeaderValue::from_str(&refreshed).map_err(|e| {
            warn!(error = %e, "Reissued token is not a valid header value");
            AppError::Internal
        })?;
        response
            .headers_mut()
            .insert(REFRESH_TOKEN_HEADER, header_value);

        info!(sub = claims.sub, "Attached refreshed token to response");
    }

    Ok(response)
}
