// Public API - what other modules can use
pub use handlers::{get_account, signin, signin_check, signup, update_profile};
pub use service::AccountService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
