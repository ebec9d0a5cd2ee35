use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{AccountModel, AccountRole, NewAccount, ProfileUpdate};
use crate::shared::AppError;

/// Trait for account repository operations. Covers both the accounts table
/// and the one-hash-per-account passwords table.
#[async_trait]
pub trait AccountRepository {
    async fn create_account(
        &self,
        new_account: &NewAccount,
        password_hash: &str,
    ) -> Result<AccountModel, AppError>;
    async fn get_account(&self, account_id: i64) -> Result<Option<AccountModel>, AppError>;
    async fn get_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountModel>, AppError>;
    async fn get_password_hash(&self, account_id: i64) -> Result<Option<String>, AppError>;
    async fn update_profile(
        &self,
        account_id: i64,
        update: &ProfileUpdate,
    ) -> Result<(), AppError>;
}

/// In-memory implementation of AccountRepository for development and testing
///
/// This provides a realistic implementation that can be used in development
/// without requiring a real database connection. Data is stored in memory
/// and will be lost when the application restarts.
pub struct InMemoryAccountRepository {
    state: Mutex<InMemoryState>,
}

struct InMemoryState {
    accounts: HashMap<i64, AccountModel>,
    password_hashes: HashMap<i64, String>,
    next_id: i64,
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAccountRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryState {
                accounts: HashMap::new(),
                password_hashes: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Returns the current number of accounts in the repository
    pub fn account_count(&self) -> usize {
        self.state.lock().unwrap().accounts.len()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    #[instrument(skip(self, new_account, password_hash))]
    async fn create_account(
        &self,
        new_account: &NewAccount,
        password_hash: &str,
    ) -> Result<AccountModel, AppError> {
        debug!(username = %new_account.username, "Creating account in memory");

        let mut state = self.state.lock().unwrap();
        if state
            .accounts
            .values()
            .any(|a| a.username == new_account.username)
        {
            warn!(username = %new_account.username, "Username already taken");
            return Err(AppError::DatabaseError(
                "Username already taken".to_string(),
            ));
        }

        let id = state.next_id;
        state.next_id += 1;

        let account = AccountModel {
            id,
            username: new_account.username.clone(),
            email: new_account.email.clone(),
            name: String::new(),
            role: AccountRole::Volunteer,
            phone: None,
            description: None,
        };
        state.accounts.insert(id, account.clone());
        state.password_hashes.insert(id, password_hash.to_string());

        debug!(account_id = id, "Account created successfully in memory");
        Ok(account)
    }

    #[instrument(skip(self))]
    async fn get_account(&self, account_id: i64) -> Result<Option<AccountModel>, AppError> {
        debug!(account_id, "Fetching account from memory");

        let state = self.state.lock().unwrap();
        Ok(state.accounts.get(&account_id).cloned())
    }

    #[instrument(skip(self))]
    async fn get_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountModel>, AppError> {
        debug!(username, "Fetching account by username from memory");

        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, account_id: i64) -> Result<Option<String>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.password_hashes.get(&account_id).cloned())
    }

    #[instrument(skip(self, update))]
    async fn update_profile(
        &self,
        account_id: i64,
        update: &ProfileUpdate,
    ) -> Result<(), AppError> {
        debug!(account_id, "Updating account profile in memory");

        let mut state = self.state.lock().unwrap();
        let account = state.accounts.get_mut(&account_id).ok_or_else(|| {
            warn!(account_id, "Account not found for profile update");
            AppError::NotFound("Account not found".to_string())
        })?;

        account.role = update.role;
        account.name = update.name.clone();
        account.phone = update.phone.clone();
        account.description = update.description.clone();

        debug!(account_id, "Account profile updated successfully in memory");
        Ok(())
    }
}

/// PostgreSQL implementation of account repository
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_account_row(row: &PgRow) -> Result<AccountModel, AppError> {
        let raw_role: String = row.get("account_type");
        let role = raw_role.parse::<AccountRole>().map_err(|_| {
            warn!(account_type = %raw_role, "Unknown account type in accounts row");
            AppError::DatabaseError(format!("Unknown account type: {}", raw_role))
        })?;

        Ok(AccountModel {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            name: row.get("name"),
            role,
            phone: row.get("phone"),
            description: row.get("description"),
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[instrument(skip(self, new_account, password_hash))]
    async fn create_account(
        &self,
        new_account: &NewAccount,
        password_hash: &str,
    ) -> Result<AccountModel, AppError> {
        debug!(username = %new_account.username, "Creating account in database");

        let row = sqlx::query(
            "INSERT INTO accounts (username, email) VALUES ($1, $2) \
             RETURNING id, username, email, name, account_type, phone, description",
        )
        .bind(&new_account.username)
        .bind(&new_account.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create account in database");
            AppError::DatabaseError(e.to_string())
        })?;

        let account = Self::map_account_row(&row)?;

        sqlx::query("INSERT INTO passwords (account_id, password_hash) VALUES ($1, $2)")
            .bind(account.id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, account_id = account.id, "Failed to store password hash");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(account_id = account.id, "Account created successfully in database");
        Ok(account)
    }

    #[instrument(skip(self))]
    async fn get_account(&self, account_id: i64) -> Result<Option<AccountModel>, AppError> {
        debug!(account_id, "Fetching account from database");

        let row = sqlx::query(
            "SELECT id, username, email, name, account_type, phone, description \
             FROM accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, account_id, "Failed to fetch account from database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.map(|row| Self::map_account_row(&row)).transpose()
    }

    #[instrument(skip(self))]
    async fn get_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountModel>, AppError> {
        debug!(username, "Fetching account by username from database");

        let row = sqlx::query(
            "SELECT id, username, email, name, account_type, phone, description \
             FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, username, "Failed to fetch account from database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.map(|row| Self::map_account_row(&row)).transpose()
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, account_id: i64) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT password_hash FROM passwords WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, account_id, "Failed to fetch password hash from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(|row| row.get("password_hash")))
    }

    #[instrument(skip(self, update))]
    async fn update_profile(
        &self,
        account_id: i64,
        update: &ProfileUpdate,
    ) -> Result<(), AppError> {
        debug!(account_id, "Updating account profile in database");

        let result = sqlx::query(
            "UPDATE accounts SET account_type = $2, name = $3, phone = $4, description = $5 \
             WHERE id = $1",
        )
        .bind(account_id)
        .bind(update.role.to_string())
        .bind(&update.name)
        .bind(&update.phone)
        .bind(&update.description)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, account_id, "Failed to update account profile");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(account_id, "Account not found for profile update");
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        debug!(account_id, "Account profile updated successfully in database");
        Ok(())
    }
}
