use serde::{Deserialize, Serialize};

use crate::account::models::AccountRole;

/// JWT claims structure carried by every authenticated request.
/// `sub` is the account id, `name` the display name used for rendering,
/// `role` the account type used for authorization decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthClaims {
    pub sub: i64,
    pub name: String,
    pub role: AccountRole,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

impl AuthClaims {
    /// True once less than half of the token's validity window remains.
    /// The sliding-refresh middleware reissues the token past this point.
    pub fn past_refresh_midpoint(&self, now: i64) -> bool {
        let total = self.exp.saturating_sub(self.iat);
        let remaining = (self.exp as i64).saturating_sub(now).max(0) as usize;
        remaining * 2 < total
    }
}
