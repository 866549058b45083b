use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use element_core::timeline::{TimelineWindow, DEFAULT_WINDOW_DAYS};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::str::FromStr;

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub default_filters: Vec<String>,
    /// Path to the sqlite database; `ELEMENT_DATABASE_PATH` overrides.
    pub database_path: Option<String>,
    /// IANA timezone used to anchor "today"; detected when unset.
    pub default_timezone: Option<String>,
    #[serde(default)]
    pub timeline: TimelineConfig,
}

/// Timeline window defaults, overridable per invocation with --back/--forward
#[derive(Deserialize, Debug)]
pub struct TimelineConfig {
    pub days_back: u32,
    pub days_forward: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            days_back: DEFAULT_WINDOW_DAYS,
            days_forward: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ELEMENT_"))
            .extract()
    }

    /// The window used when a command supplies no explicit override.
    pub fn window(&self) -> TimelineWindow {
        TimelineWindow::new(self.timeline.days_back, self.timeline.days_forward)
    }

    /// Today's calendar date in the configured (or detected) timezone.
    pub fn today(&self) -> NaiveDate {
        let tz_name = self
            .default_timezone
            .clone()
            .unwrap_or_else(detect_system_timezone);
        match tz_name.parse::<Tz>() {
            Ok(tz) => Utc::now().with_timezone(&tz).date_naive(),
            Err(_) => Utc::now().date_naive(),
        }
    }
}

/// Validates that a timezone string is a valid IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<Tz, String> {
    Tz::from_str(timezone).map_err(|_| {
        format!(
            "Invalid timezone: '{}'. Use IANA timezone names like 'America/New_York'",
            timezone
        )
    })
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    // Method 1: Check TZ environment variable
    if let Ok(tz) = std::env::var("TZ") {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    // Method 2: Try to read from /etc/timezone (Linux)
    #[cfg(target_os = "linux")]
    {
        if let Ok(tz) = std::fs::read_to_string("/etc/timezone") {
            let tz = tz.trim();
            if validate_timezone(tz).is_ok() {
                return tz.to_string();
            }
        }
    }

    // Method 3: Platform-aware detection
    if let Ok(local_tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&local_tz).is_ok() {
            return local_tz;
        }
    }

    // Fallback to UTC
    "UTC".to_string()
}
