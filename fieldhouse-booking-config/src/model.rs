//! The records flowing between the config store, the session controller and
//! the results sink.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Login material for one account. The Debug form redacts the password so
/// that credential values cannot leak through ordinary logging.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub login_url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("login_url", &self.login_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What one user wants booked. Immutable once loaded; `date` is always in
/// ISO `yyyy-mm-dd` form by the time it gets here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPreference {
    pub facility: String,
    pub time: String,
    pub date: String,
    pub court_number: Option<String>,
    pub cell_number: Option<String>,
    pub booking_reason: Option<String>,
}

/// One orchestrated user: created by the orchestrator, consumed by exactly
/// one session controller, dropped after its outcome is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub id: String,
    pub credential: Credential,
    pub preference: BookingPreference,
}

/// One attempt's flat result record, append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingOutcome {
    pub user_id: String,
    pub success: bool,
    pub timestamp: String,
    pub facility: String,
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_debug_redacts_the_password() {
        let credential = Credential {
            login_url: "https://example.com/login".to_owned(),
            username: "alice".to_owned(),
            password: "hunter2".to_owned(),
        };
        let debug = format!("{credential:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
