use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use handraise::{
    account::repository::InMemoryAccountRepository,
    account::types::{AccountResponse, SigninResponse},
    attendance::repository::InMemoryAttendanceRepository,
    event::repository::InMemoryEventRepository,
    event::types::EventResponse,
    router, AppState, TokenConfig,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub state: AppState,
}

pub struct TestSetupBuilder {
    ttl_minutes: i64,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { ttl_minutes: 60 }
    }

    #[allow(dead_code)] // Not every test file exercises custom lifetimes
    pub fn with_token_ttl(mut self, ttl_minutes: i64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }

    pub fn build(self) -> TestSetup {
        let state = AppState::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(InMemoryAttendanceRepository::new()),
            TokenConfig::with_secret("integration-test-secret", self.ttl_minutes),
        );
        TestSetup {
            app: router(state.clone()),
            state,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSetup {
    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = builder.body(Body::empty()).unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: &str) -> Response<Body> {
        self.send_json("POST", uri, token, body).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: &str) -> Response<Body> {
        self.send_json("PUT", uri, token, body).await
    }

    async fn send_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &str,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Signs up an account with a default password
    pub async fn signup(&self, username: &str) -> AccountResponse {
        let response = self
            .post_json(
                "/user/signup",
                None,
                &format!(
                    r#"{{"username": "{0}", "email": "{0}@example.org", "password": "hunter2"}}"#,
                    username
                ),
            )
            .await;
        assert!(response.status().is_success(), "signup failed");
        body_json(response).await
    }

    /// Signs in with the default password and returns the bearer token
    pub async fn signin(&self, username: &str) -> SigninResponse {
        let response = self
            .post_json(
                "/user/signin",
                None,
                &format!(r#"{{"username": "{}", "password": "hunter2"}}"#, username),
            )
            .await;
        assert!(response.status().is_success(), "signin failed");
        body_json(response).await
    }

    /// Switches an account's role through the profile endpoint and returns a
    /// token carrying the new role
    pub async fn promote_to_npo(&self, username: &str, token: &str) -> String {
        let response = self
            .put_json(
                "/user/update",
                Some(token),
                &format!(
                    r#"{{"role": "NPO", "name": "{}", "phone": null, "description": null}}"#,
                    username
                ),
            )
            .await;
        assert!(response.status().is_success(), "profile update failed");

        // The old token still claims Volunteer; sign in again for an NPO one
        self.signin(username).await.token
    }

    /// Signs up an NPO account and returns (account id, NPO token)
    pub async fn npo_account(&self, username: &str) -> (i64, String) {
        let account = self.signup(username).await;
        let token = self.signin(username).await.token;
        let npo_token = self.promote_to_npo(username, &token).await;
        (account.id, npo_token)
    }

    /// Signs up a volunteer account and returns (account id, token)
    pub async fn volunteer_account(&self, username: &str) -> (i64, String) {
        let account = self.signup(username).await;
        let token = self.signin(username).await.token;
        (account.id, token)
    }

    /// Creates a three-day event owned by the NPO token's account
    pub async fn create_event(&self, npo_token: &str) -> EventResponse {
        let response = self
            .post_json(
                "/event/create",
                Some(npo_token),
                r#"{
                    "event_name": "Park cleanup",
                    "description": "Bring gloves",
                    "start_time": "2025-06-01T09:00:00Z",
                    "end_time": "2025-06-03T17:00:00Z"
                }"#,
            )
            .await;
        assert!(response.status().is_success(), "event creation failed");
        body_json(response).await
    }

    /// Enrolls a volunteer into an event
    pub async fn enroll(&self, token: &str, event_id: i64, volunteer_id: i64) {
        let response = self
            .post_json(
                &format!("/event/{}/enrollment/modify", event_id),
                Some(token),
                &format!(r#"{{"volunteer_id": {}, "enrolled": true}}"#, volunteer_id),
            )
            .await;
        assert!(response.status().is_success(), "enrollment failed");
    }
}

pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
