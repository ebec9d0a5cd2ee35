use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{AccountModel, AccountRole, NewAccount, ProfileUpdate},
    repository::AccountRepository,
    types::{SigninRequest, SigninResponse, SignupRequest, UpdateProfileRequest},
};
use crate::auth::{hash_password, verify_password, TokenConfig};
use crate::shared::AppError;

/// Service for handling account business logic
pub struct AccountService {
    repository: Arc<dyn AccountRepository + Send + Sync>,
    token_config: TokenConfig,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepository + Send + Sync>,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            repository,
            token_config,
        }
    }

    /// Creates an account and its password hash
    #[instrument(skip(self, request))]
    pub async fn signup(&self, request: SignupRequest) -> Result<AccountModel, AppError> {
        info!(username = %request.username, "Starting signup");

        if request.username.is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let new_account = NewAccount {
            username: request.username,
            email: request.email,
        };

        let account = self
            .repository
            .create_account(&new_account, &password_hash)
            .await?;

        info!(account_id = account.id, "Signup completed successfully");
        Ok(account)
    }

    /// Verifies the password and issues a JWT for the account
    #[instrument(skip(self, request))]
    pub async fn signin(&self, request: SigninRequest) -> Result<SigninResponse, AppError> {
        info!(username = %request.username, "Starting signin");

        let account = self
            .repository
            .get_account_by_username(&request.username)
            .await?
            .ok_or_else(|| {
                warn!(username = %request.username, "Signin for unknown account");
                AppError::BadRequest("That account does not exist".to_string())
            })?;

        let password_hash = self
            .repository
            .get_password_hash(account.id)
            .await?
            .ok_or_else(|| {
                warn!(account_id = account.id, "Account has no password hash");
                AppError::DatabaseError("Password hash missing for account".to_string())
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(account_id = account.id, "Wrong password");
            return Err(AppError::BadRequest("Wrong password".to_string()));
        }

        let name = account.display_name().to_string();
        let token = self
            .token_config
            .create_token(account.id, &name, account.role)?;

        info!(account_id = account.id, "Signin successful");
        Ok(SigninResponse {
            token,
            name,
            role: account.role,
        })
    }

    /// Fetches an account by id
    #[instrument(skip(self))]
    pub async fn get_account(&self, account_id: i64) -> Result<AccountModel, AppError> {
        self.repository
            .get_account(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    /// Updates the caller's profile fields
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        account_id: i64,
        request: UpdateProfileRequest,
    ) -> Result<(), AppError> {
        info!(account_id, "Updating profile");

        let update = ProfileUpdate {
            role: request.role,
            name: request.name,
            phone: request.phone,
            description: request.description,
        };
        self.repository.update_profile(account_id, &update).await
    }

    /// Role gate for privileged actions. The role claimed in the token must
    /// match the expected role, and so must the account row's current role -
    /// a stale token cannot keep privileges a profile change revoked.
    #[instrument(skip(self))]
    pub async fn verify_role(
        &self,
        account_id: i64,
        claimed: AccountRole,
        expected: AccountRole,
    ) -> Result<(), AppError> {
        if claimed != expected {
            warn!(account_id, %claimed, %expected, "Token role does not match expected role");
            return Err(AppError::Forbidden(format!(
                "Requires {} role",
                expected
            )));
        }

        let account = self.repository.get_account(account_id).await?.ok_or_else(|| {
            warn!(account_id, "Account behind token no longer exists");
            AppError::Forbidden("Account not found".to_string())
        })?;

        if account.role != expected {
            warn!(account_id, current = %account.role, %expected, "Account role changed since token was issued");
            return Err(AppError::Forbidden(format!(
                "Requires {} role",
                expected
            )));
        }

        Ok(())
    }
}
