//! Scrape schedule loaded from a YAML file.
//!
//! Two modes are supported:
//!
//! ```yaml
//! # every N minutes
//! mode: interval
//! interval_minutes: 60
//! run_on_startup: true
//! ```
//!
//! ```yaml
//! # fixed local wall-clock times
//! mode: fixed
//! times: ["06:30", "09:00", "12:00"]
//! ```

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use config::{Config, File, FileFormat};
use serde::Deserialize;

const DEFAULT_INTERVAL_MINUTES: u64 = 60;

/// Invalid or unreadable schedule file.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The file exists but could not be read.
    #[error("could not read schedule file: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML could not be parsed into the schedule shape.
    #[error("invalid schedule file: {0}")]
    Parse(#[from] config::ConfigError),

    /// `mode` is neither `interval` nor `fixed`.
    #[error("unknown schedule mode '{0}', expected 'interval' or 'fixed'")]
    UnknownMode(String),

    /// Interval mode with a zero interval.
    #[error("interval_minutes must be greater than zero")]
    ZeroInterval,

    /// Fixed mode without any times.
    #[error("fixed schedule needs at least one entry in 'times'")]
    NoTimes,

    /// A fixed time is not `HH:MM` or `HH:MM:SS`.
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Raw shape of the YAML file.
#[derive(Debug, Deserialize)]
struct ScheduleFile {
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default)]
    interval_minutes: Option<u64>,
    #[serde(default)]
    times: Vec<String>,
    #[serde(default = "default_run_on_startup")]
    run_on_startup: bool,
}

fn default_mode() -> String {
    "interval".to_string()
}

const fn default_run_on_startup() -> bool {
    true
}

/// When scrapes happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// A fixed period between attempts.
    Interval(Duration),
    /// Local wall-clock times, every day. Sorted and de-duplicated.
    Fixed(Vec<NaiveTime>),
}

impl Schedule {
    /// Returns the next run strictly after `now` (local wall-clock time).
    ///
    /// A fixed schedule wraps to its first time on the following day.
    #[must_use]
    pub fn next_run_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Interval(period) => {
                let step = TimeDelta::from_std(*period).unwrap_or(TimeDelta::hours(1));
                now.checked_add_signed(step).unwrap_or(now)
            }
            Self::Fixed(times) => {
                if let Some(today) = times.iter().find(|t| **t > now.time()) {
                    return now.date().and_time(*today);
                }
                let Some(first) = times.first() else {
                    return now + TimeDelta::hours(1);
                };
                now.date()
                    .checked_add_days(Days::new(1))
                    .map_or(now + TimeDelta::days(1), |d| d.and_time(*first))
            }
        }
    }

    /// Returns the instant of the next run strictly after `now`.
    ///
    /// An interval is measured in elapsed time. Fixed wall-clock slots are
    /// resolved in `now`'s time zone, so a DST change does not shift them.
    /// A slot that does not exist that day (spring-forward gap) is skipped;
    /// a repeated slot (fall-back) runs at its first occurrence only.
    #[must_use]
    pub fn next_run_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        match self {
            Self::Interval(period) => {
                let step = TimeDelta::from_std(*period).unwrap_or(TimeDelta::hours(1));
                now.clone()
                    .checked_add_signed(step)
                    .unwrap_or_else(|| now.clone())
            }
            Self::Fixed(times) => {
                let tz = now.timezone();
                let mut wall = self.next_run_after(now.naive_local());
                // one full day of slots, plus one, covers every gap
                for _ in 0..=times.len() {
                    if let Some(at) = tz.from_local_datetime(&wall).earliest()
                        && at > *now
                    {
                        return at;
                    }
                    wall = self.next_run_after(wall);
                }
                now.clone() + TimeDelta::hours(1)
            }
        }
    }

    /// Time to wait from `now` until [`Self::next_run_at`].
    #[must_use]
    pub fn delay_until_next<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        (self.next_run_at(now) - now.clone())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Validated schedule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// When scrapes happen.
    pub schedule: Schedule,
    /// Whether to scrape once immediately at startup.
    pub run_on_startup: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            schedule: Schedule::Interval(Duration::from_secs(DEFAULT_INTERVAL_MINUTES * 60)),
            run_on_startup: true,
        }
    }
}

impl ScheduleConfig {
    /// Loads the schedule from `path`, falling back to the hourly default
    /// when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "schedule file not found, scraping every {DEFAULT_INTERVAL_MINUTES} minutes"
            );
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::info!(path = %path.display(), schedule = ?config.schedule, "schedule loaded");
        Ok(config)
    }

    /// Parses and validates a schedule from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the YAML is malformed or invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScheduleError> {
        let raw: ScheduleFile = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()?;
        Self::try_from(raw)
    }
}

impl TryFrom<ScheduleFile> for ScheduleConfig {
    type Error = ScheduleError;

    fn try_from(raw: ScheduleFile) -> Result<Self, Self::Error> {
        let schedule = match raw.mode.trim().to_lowercase().as_str() {
            "interval" => {
                let minutes = raw.interval_minutes.unwrap_or(DEFAULT_INTERVAL_MINUTES);
                if minutes == 0 {
                    return Err(ScheduleError::ZeroInterval);
                }
                Schedule::Interval(Duration::from_secs(minutes.saturating_mul(60)))
            }
            "fixed" => {
                let mut times = raw
                    .times
                    .iter()
                    .map(|t| parse_time(t))
                    .collect::<Result<Vec<_>, _>>()?;
                if times.is_empty() {
                    return Err(ScheduleError::NoTimes);
                }
                times.sort_unstable();
                times.dedup();
                Schedule::Fixed(times)
            }
            other => return Err(ScheduleError::UnknownMode(other.to_string())),
        };

        Ok(Self {
            schedule,
            run_on_startup: raw.run_on_startup,
        })
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, ScheduleError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ScheduleError::InvalidTime(raw.to_string()))
}
