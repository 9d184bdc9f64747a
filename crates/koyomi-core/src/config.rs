use anyhow::Result;
use chrono::NaiveTime;
use config::Config;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Visibility;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub calendar: CalendarDefaults,
    pub logging: LoggingConfig,
}

/// Raw, string-typed calendar defaults as they arrive from the environment
/// or a `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarDefaults {
    /// Time-of-day opening the all-day window, "HH:MM".
    pub all_day_start: String,
    /// Time-of-day closing the all-day window, "HH:MM".
    pub all_day_end: String,
    /// Visibility assigned to drafts that do not specify one.
    pub visibility: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("calendar.all_day_start", "08:00")?
            .set_default("calendar.all_day_end", "17:00")?
            .set_default("calendar.visibility", "public")?
            .set_default("logging.level", "debug")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Parses the raw calendar defaults into an engine-ready [`CalendarPolicy`].
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if a time-of-day or visibility value
    /// does not parse, or if the all-day window is not strictly ordered.
    pub fn policy(&self) -> CoreResult<CalendarPolicy> {
        let all_day_start = parse_time_of_day(&self.calendar.all_day_start)?;
        let all_day_end = parse_time_of_day(&self.calendar.all_day_end)?;
        if all_day_end <= all_day_start {
            return Err(CoreError::InvalidConfiguration(format!(
                "all-day window must end after it starts ({all_day_start}..{all_day_end})"
            )));
        }
        let default_visibility = self.calendar.visibility.parse::<Visibility>()?;

        Ok(CalendarPolicy {
            all_day_start,
            all_day_end,
            default_visibility,
        })
    }
}

fn parse_time_of_day(value: &str) -> CoreResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|err| {
        CoreError::InvalidConfiguration(format!("bad time-of-day {value:?}: {err}"))
    })
}

/// Policy values the engine consumes. Supplied once at engine construction;
/// immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPolicy {
    /// Start of the window representing a date-only event.
    pub all_day_start: NaiveTime,
    /// End of the window representing a date-only event.
    pub all_day_end: NaiveTime,
    /// Visibility assigned when a draft leaves it unspecified.
    pub default_visibility: Visibility,
}

impl Default for CalendarPolicy {
    fn default() -> Self {
        Self {
            all_day_start: NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid time"),
            all_day_end: NaiveTime::from_hms_opt(17, 0, 0).expect("17:00 is a valid time"),
            default_visibility: Visibility::Public,
        }
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
