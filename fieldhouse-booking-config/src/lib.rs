//! Configuration store and data model.
//!
//! Bookings are described by TOML tables keyed on a fixed schema: a global
//! `LOGIN`/`BOOKING` pair for a single account, or `{user}_LOGIN`/
//! `{user}_BOOKING` pairs for a roster. Values can be overridden from the
//! environment with a `FIELDHOUSE_` prefix (`FIELDHOUSE_LOGIN__PASSWORD=...`).

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::America::St_Johns;
use chrono_tz::Tz;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use tracing::info;

pub mod model;

pub use model::{BookingOutcome, BookingPreference, Credential, UserContext};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
    #[error("missing section `{0}`")]
    MissingSection(String),
    #[error("missing option `{key}` in section `{section}`")]
    MissingKey { section: String, key: String },
    #[error("no `*_LOGIN` sections found, nothing to book")]
    EmptyRoster,
}

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// The booking date every attempt of this run targets, fixed at the instant
/// configuration was loaded. Computed once and shared so that a long run
/// straddling midnight cannot end up with two different target dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDate {
    pub date: NaiveDate,
    pub computed_at: DateTime<Tz>,
}

impl TargetDate {
    /// Days ahead the facility opens slots for reservation.
    pub const BOOKING_WINDOW_DAYS: u64 = 6;

    /// The end of the booking window as seen from St. John's right now.
    #[must_use]
    pub fn six_days_out() -> Self {
        Self::from_instant(Utc::now().with_timezone(&St_Johns))
    }

    /// The end of the booking window as seen from an explicit instant.
    #[must_use]
    pub fn from_instant(now: DateTime<Tz>) -> Self {
        Self {
            date: now.date_naive() + Days::new(Self::BOOKING_WINDOW_DAYS),
            computed_at: now,
        }
    }

    #[must_use]
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// A loaded configuration: raw sections plus the run's single target date.
/// Deliberately not `Debug`; the raw sections hold passwords.
#[derive(Clone)]
pub struct BookingConfig {
    sections: Sections,
    pub target_date: TargetDate,
}

impl BookingConfig {
    /// Reads the TOML file at `path` merged with `FIELDHOUSE_`-prefixed
    /// environment variables, and pins the target date for the whole run.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(path))
                .merge(Env::prefixed("FIELDHOUSE_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let sections: Sections = figment.extract()?;
        let target_date = TargetDate::six_days_out();
        info!(
            date = %target_date.iso(),
            computed_at = %target_date.computed_at,
            "target date pinned for this run"
        );
        Ok(Self {
            sections,
            target_date,
        })
    }

    /// User ids of every `{user}_LOGIN` section, in sorted order.
    #[must_use]
    pub fn roster(&self) -> Vec<String> {
        self.sections
            .keys()
            .filter_map(|name| name.strip_suffix("_LOGIN"))
            .map(ToOwned::to_owned)
            .collect()
    }

    /// The single-user context from the global `LOGIN`/`BOOKING` pair.
    pub fn single_user(&self, use_config_date: bool) -> Result<UserContext, ConfigError> {
        self.build_user("default", "", use_config_date)
    }

    /// The context for one roster user from its prefixed section pair.
    pub fn user(&self, id: &str, use_config_date: bool) -> Result<UserContext, ConfigError> {
        self.build_user(id, &format!("{id}_"), use_config_date)
    }

    /// All roster users. Errors out before any browser interaction when a
    /// section is incomplete.
    pub fn all_users(&self, use_config_date: bool) -> Result<Vec<UserContext>, ConfigError> {
        let roster = self.roster();
        if roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        roster
            .iter()
            .map(|id| self.user(id, use_config_date))
            .collect()
    }

    fn build_user(
        &self,
        id: &str,
        prefix: &str,
        use_config_date: bool,
    ) -> Result<UserContext, ConfigError> {
        let login = self.section(&format!("{prefix}LOGIN"))?;
        let booking = self.section(&format!("{prefix}BOOKING"))?;

        let credential = Credential {
            login_url: required(login, &format!("{prefix}LOGIN"), "url")?,
            username: required(login, &format!("{prefix}LOGIN"), "username")?,
            password: required(login, &format!("{prefix}LOGIN"), "password")?,
        };

        let config_date = optional(booking, "date");
        let date = match config_date {
            Some(date) if use_config_date => date,
            _ => {
                info!(user = id, date = %self.target_date.iso(), "date set to booking-window end");
                self.target_date.iso()
            }
        };

        let preference = BookingPreference {
            facility: required(booking, &format!("{prefix}BOOKING"), "facility")?,
            time: required(booking, &format!("{prefix}BOOKING"), "time")?,
            date,
            court_number: optional(booking, "court_number"),
            cell_number: optional(booking, "cell_number"),
            booking_reason: optional(booking, "booking_reason"),
        };

        Ok(UserContext {
            id: id.to_owned(),
            credential,
            preference,
        })
    }

    fn section(&self, name: &str) -> Result<&BTreeMap<String, String>, ConfigError> {
        self.sections
            .get(name)
            .ok_or_else(|| ConfigError::MissingSection(name.to_owned()))
    }
}

fn required(
    section: &BTreeMap<String, String>,
    section_name: &str,
    key: &str,
) -> Result<String, ConfigError> {
    section
        .get(key)
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .ok_or_else(|| ConfigError::MissingKey {
            section: section_name.to_owned(),
            key: key.to_owned(),
        })
}

fn optional(section: &BTreeMap<String, String>, key: &str) -> Option<String> {
    section
        .get(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
