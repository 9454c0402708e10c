//! The weather snapshot extracted from one Tages-News bulletin.
//!
//! [`WeatherSnapshot`] is the only persistent entity. It is overwritten in
//! place on every successful scrape; no history is kept.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder for every field the bulletin did not yield.
pub const UNKNOWN: &str = "Unknown";

/// Date format of the `date` field (ISO calendar date).
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Latest ski weather as printed in the Tages-News PDF.
///
/// All fields except `date` and `last_updated` are kept verbatim as printed
/// (e.g. `"-5°C"`, `"20 cm"`). Fields default to [`UNKNOWN`], so a snapshot
/// file written by an older build still deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct WeatherSnapshot {
    /// Bulletin date, `YYYY-MM-DD`.
    pub date: String,
    /// Air temperature, e.g. `"-5°C"`.
    pub temperature: String,
    /// Free-text weather condition (`Wetterlage`).
    pub weather_condition: String,
    /// Average snow depth (`durchschnittliche Schneehöhe`).
    pub snow_depth: String,
    /// Snow type (`Schneeart`), e.g. `"Pulver"`.
    pub snow_type: String,
    /// Date of the last snowfall as printed.
    pub last_snowfall: String,
    /// Bulletin update time as printed after `Uhrzeit:`.
    pub update_time: String,
    /// When this snapshot was written to disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self {
            date: UNKNOWN.to_string(),
            temperature: UNKNOWN.to_string(),
            weather_condition: UNKNOWN.to_string(),
            snow_depth: UNKNOWN.to_string(),
            snow_type: UNKNOWN.to_string(),
            last_snowfall: UNKNOWN.to_string(),
            update_time: UNKNOWN.to_string(),
            last_updated: None,
        }
    }
}

impl WeatherSnapshot {
    /// Returns the bulletin date, if `date` holds a valid ISO date.
    #[must_use]
    pub fn report_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, REPORT_DATE_FORMAT).ok()
    }

    /// Returns `true` if the bulletin was issued on `day`.
    #[must_use]
    pub fn is_from(&self, day: NaiveDate) -> bool {
        self.report_date() == Some(day)
    }

    /// Names of the extracted fields that are still [`UNKNOWN`].
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("date", &self.date),
            ("temperature", &self.temperature),
            ("weather_condition", &self.weather_condition),
            ("snow_depth", &self.snow_depth),
            ("snow_type", &self.snow_type),
            ("last_snowfall", &self.last_snowfall),
            ("update_time", &self.update_time),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_str() == UNKNOWN)
        .map(|(name, _)| name)
        .collect()
    }

    /// Returns the snapshot stamped with the given save time, replacing any
    /// previous stamp.
    #[must_use]
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = Some(at);
        self
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn sample() -> WeatherSnapshot {
        WeatherSnapshot {
            date: "2025-11-22".to_string(),
            temperature: "-5°C".to_string(),
            weather_condition: "sonnig".to_string(),
            snow_depth: "20 cm".to_string(),
            snow_type: "Pulver".to_string(),
            last_snowfall: "20.11.2025".to_string(),
            update_time: "08:00Uhr".to_string(),
            last_updated: None,
        }
    }

    #[test]
    fn default_is_all_unknown() {
        let snapshot = WeatherSnapshot::default();
        assert_eq!(snapshot.missing_fields().len(), 7);
        assert!(snapshot.last_updated.is_none());
        assert!(snapshot.report_date().is_none());
    }

    #[test]
    fn complete_snapshot_has_no_missing_fields() {
        assert!(sample().missing_fields().is_empty());
    }

    #[test]
    fn is_from_compares_report_date() {
        let Some(day) = NaiveDate::from_ymd_opt(2025, 11, 22) else {
            panic!("valid date");
        };
        assert!(sample().is_from(day));
        assert!(!sample().is_from(day.succ_opt().unwrap_or(day)));
    }

    #[test]
    fn stamping_overwrites_previous_timestamp() {
        let old = DateTime::<Utc>::UNIX_EPOCH;
        let now = Utc::now();
        let snapshot = sample().stamped(old).stamped(now);
        assert_eq!(snapshot.last_updated, Some(now));
    }

    #[test]
    fn unstamped_snapshot_omits_last_updated() {
        let json = serde_json::to_value(sample()).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert!(json.get("last_updated").is_none());
        assert_eq!(json["temperature"], "-5°C");
    }

    #[test]
    fn partial_json_fills_unknown() {
        let parsed: Result<WeatherSnapshot, _> =
            serde_json::from_str(r#"{"date": "2025-11-22", "temperature": "-5°C"}"#);
        let Ok(parsed) = parsed else {
            panic!("deserialization failed");
        };
        assert_eq!(parsed.temperature, "-5°C");
        assert_eq!(parsed.snow_type, UNKNOWN);
    }
}
