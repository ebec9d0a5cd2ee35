use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Account role, a closed set. `NPO` accounts organize events, `Volunteer`
/// accounts enroll in and attend them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum AccountRole {
    #[serde(rename = "NPO")]
    #[strum(serialize = "NPO")]
    Npo,
    Volunteer,
}

/// Database model for the accounts table. The password hash lives in the
/// separate passwords table, one row per account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: AccountRole,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl AccountModel {
    /// Display name for tokens and rosters. Accounts that have not filled in
    /// their profile yet fall back to the login username.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

/// Fields supplied at signup. Everything else starts from defaults and is
/// filled in through the profile update endpoint.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
}

/// Profile fields the owning account may change after signup
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub role: AccountRole,
    pub name: String,
    pub phone: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_strings() {
        assert_eq!("NPO".parse::<AccountRole>().unwrap(), AccountRole::Npo);
        assert_eq!(
            "Volunteer".parse::<AccountRole>().unwrap(),
            AccountRole::Volunteer
        );
        assert_eq!(AccountRole::Npo.to_string(), "NPO");
        assert_eq!(AccountRole::Volunteer.to_string(), "Volunteer");
    }

    #[test]
    fn test_unknown_role_string_is_rejected() {
        assert!("Admin".parse::<AccountRole>().is_err());
    }

    #[test]
    fn test_role_serde_uses_wire_names() {
        let json = serde_json::to_string(&AccountRole::Npo).unwrap();
        assert_eq!(json, "\"NPO\"");
        let parsed: AccountRole = serde_json::from_str("\"Volunteer\"").unwrap();
        assert_eq!(parsed, AccountRole::Volunteer);
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut account = AccountModel {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.org".to_string(),
            name: String::new(),
            role: AccountRole::Volunteer,
            phone: None,
            description: None,
        };
        assert_eq!(account.display_name(), "jdoe");

        account.name = "Jane Doe".to_string();
        assert_eq!(account.display_name(), "Jane Doe");
    }
}
