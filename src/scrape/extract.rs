//! Field parsing over the page-1 text of the Tages-News bulletin.
//!
//! The bulletin is a two-column table of German labels and values. Depending
//! on how the PDF was produced, a value appears either on the label's line
//! (`Wetterlage: sonnig`) or on the following line. Both layouts are handled.

use chrono::NaiveDate;

use crate::domain::WeatherSnapshot;
use crate::domain::snapshot::REPORT_DATE_FORMAT;

const DATE_LABEL: &str = "TAGES-NEWS";
const TEMPERATURE_LABEL: &str = "Temperatur";
const UPDATE_TIME_LABEL: &str = "Uhrzeit:";
const CONDITION_LABEL: &str = "Wetterlage:";
const SNOW_DEPTH_LABEL: &str = "durchschnittliche Schneehöhe";
const SNOW_TYPE_LABEL: &str = "Schneeart:";
const LAST_SNOWFALL_LABEL: &str = "letzter Schneefall:";

const ALL_LABELS: [&str; 7] = [
    DATE_LABEL,
    TEMPERATURE_LABEL,
    UPDATE_TIME_LABEL,
    CONDITION_LABEL,
    SNOW_DEPTH_LABEL,
    SNOW_TYPE_LABEL,
    LAST_SNOWFALL_LABEL,
];

/// Date format printed in the bulletin header.
const BULLETIN_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parses the bulletin text into a [`WeatherSnapshot`].
///
/// Fields the text does not yield stay `Unknown`. Lines are scanned top to
/// bottom and a later match for the same label overwrites an earlier one.
#[must_use]
pub fn extract_weather_data(text: &str) -> WeatherSnapshot {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut data = WeatherSnapshot::default();

    for (idx, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let rest = lines.get(idx + 1..).unwrap_or_default();
        extract_from_line(line, rest, &mut data);
    }

    tracing::info!(
        date = %data.date,
        temperature = %data.temperature,
        snow_depth = %data.snow_depth,
        "extracted weather data"
    );
    data
}

fn extract_from_line(line: &str, rest: &[&str], data: &mut WeatherSnapshot) {
    if let Some(raw) = labelled_value(line, DATE_LABEL, rest) {
        match bulletin_date_to_iso(&raw) {
            Some(iso) => data.date = iso,
            None => tracing::warn!(raw = %raw, "could not parse bulletin date"),
        }
    }

    // a qualifier such as "Temperatur (Tal)" pushes the value to the next line
    if line.contains(TEMPERATURE_LABEL)
        && let Some(value) = [labelled_value(line, TEMPERATURE_LABEL, rest), next_value(rest)]
            .into_iter()
            .flatten()
            .find(|v| v.contains("°C"))
    {
        data.temperature = value;
    }

    if let Some((_, same_line)) = line.split_once(UPDATE_TIME_LABEL) {
        let same_line = until_next_label(same_line);
        if same_line.contains("Uhr") {
            data.update_time = same_line.to_string();
        } else if let Some(next) = next_value(rest) {
            data.update_time = next;
        }
    }

    if let Some(value) = labelled_value(line, CONDITION_LABEL, rest) {
        data.weather_condition = value;
    }
    if let Some(value) = labelled_value(line, SNOW_DEPTH_LABEL, rest) {
        data.snow_depth = value;
    }
    if let Some(value) = labelled_value(line, SNOW_TYPE_LABEL, rest) {
        data.snow_type = value;
    }
    if let Some(value) = labelled_value(line, LAST_SNOWFALL_LABEL, rest) {
        data.last_snowfall = value;
    }
}

/// Value for `label` if `line` carries it: the rest of the line, or the next
/// non-empty line when the label stands alone.
fn labelled_value(line: &str, label: &str, rest: &[&str]) -> Option<String> {
    let (_, remainder) = line.split_once(label)?;
    let remainder = until_next_label(remainder.trim_start_matches(':'));
    if remainder.is_empty() {
        next_value(rest)
    } else {
        Some(remainder.to_string())
    }
}

/// Cuts `text` where the next label starts, for lines that carry more
/// than one table cell. A label only counts when it is not the start of a
/// longer word ("Temperaturanstieg").
fn until_next_label(text: &str) -> &str {
    let end = ALL_LABELS
        .iter()
        .filter_map(|label| {
            text.match_indices(label)
                .map(|(idx, _)| idx)
                .find(|idx| {
                    text.get(idx + label.len()..)
                        .and_then(|after| after.chars().next())
                        .is_none_or(|c| !c.is_alphabetic())
                })
        })
        .min()
        .unwrap_or(text.len());
    text.get(..end).unwrap_or(text).trim()
}

/// First non-empty following line, unless it is itself a label.
fn next_value(rest: &[&str]) -> Option<String> {
    rest.iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .filter(|l| !is_label_line(l))
        .map(str::to_string)
}

fn is_label_line(line: &str) -> bool {
    ALL_LABELS.iter().any(|label| line.contains(label))
}

/// `"- 22.11.2025"` → `"2025-11-22"`.
fn bulletin_date_to_iso(raw: &str) -> Option<String> {
    let token = raw
        .trim_start_matches(|c: char| c == '-' || c.is_whitespace())
        .split_whitespace()
        .next()?;
    NaiveDate::parse_from_str(token, BULLETIN_DATE_FORMAT)
        .ok()
        .map(|d| d.format(REPORT_DATE_FORMAT).to_string())
}
