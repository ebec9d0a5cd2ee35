// Public API - what other modules can use
pub use middleware::{jwt_auth, REFRESH_TOKEN_HEADER};
pub use password::{hash_password, verify_password};
pub use token::TokenConfig;
pub use types::AuthClaims;

// Internal modules
mod middleware;
mod password;
mod token;
mod types;
