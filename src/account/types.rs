use serde::{Deserialize, Serialize};

use super::models::{AccountModel, AccountRole};

/// Request payload for creating a new account
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request payload for signing in
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful signin. The token goes into the
/// Authorization Bearer header of subsequent requests.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SigninResponse {
    pub token: String,
    pub name: String,
    pub role: AccountRole,
}

/// Request payload for updating the caller's profile
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub role: AccountRole,
    pub name: String,
    pub phone: Option<String>,
    pub description: Option<String>,
}

/// Public view of an account
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: AccountRole,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl From<AccountModel> for AccountResponse {
    fn from(model: AccountModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            name: model.name,
            role: model.role,
            phone: model.phone,
            description: model.description,
        }
    }
}
