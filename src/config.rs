//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The scrape schedule lives in its own
//! YAML file, see [`crate::schedule`].
//!
//! | Variable               | Default                                   |
//! |------------------------|-------------------------------------------|
//! | `LISTEN_ADDR`          | `0.0.0.0:8000`                            |
//! | `DATA_FILE`            | `/data/weather.json` or `data/weather.json` |
//! | `SCHEDULE_FILE`        | `schedule.yaml`                           |
//! | `TAGES_NEWS_URL`       | the Altenberg Tages-News page             |
//! | `SITE_BASE_URL`        | `https://www.altenberg.de`                |
//! | `HTTP_TIMEOUT_SECS`    | `30`                                      |
//! | `REQUEST_TIMEOUT_SECS` | `10`                                      |
//! | `MIRROR_DIR`           | unset                                     |
//! | `LOG_DIR`              | unset                                     |
//! | `LOG_FORMAT`           | `text` (`json` for JSON lines)            |

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::logging::LogConfig;
use crate::scrape::{BASE_URL, ScraperConfig, TAGES_NEWS_URL};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
const CONTAINER_DATA_DIR: &str = "/data";
const DATA_FILE_NAME: &str = "weather.json";

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is set but is not a socket address.
    #[error("invalid LISTEN_ADDR '{value}': {source}")]
    ListenAddr {
        /// The rejected value.
        value: String,
        /// Parser error.
        source: AddrParseError,
    },
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Snapshot file shared by the scraper and the web server.
    pub data_file: PathBuf,

    /// YAML schedule file.
    pub schedule_file: PathBuf,

    /// Page that links the current Tages-News PDF.
    pub tages_news_url: String,

    /// Prefix for relative PDF links.
    pub site_base_url: String,

    /// Timeout for each outgoing scraper request, in seconds.
    pub http_timeout_secs: u64,

    /// Timeout for each incoming HTTP request, in seconds.
    pub request_timeout_secs: u64,

    /// Directory that receives a copy of every saved snapshot.
    pub mirror_dir: Option<PathBuf>,

    /// Directory for the daily rolling log file.
    pub log_dir: Option<PathBuf>,

    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `LISTEN_ADDR` is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `LISTEN_ADDR` cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_addr = var("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::ListenAddr {
                value: raw_addr.clone(),
                source,
            })?;

        Ok(Self {
            listen_addr,
            data_file: var("DATA_FILE").map_or_else(default_data_file, PathBuf::from),
            schedule_file: var("SCHEDULE_FILE")
                .map_or_else(|| PathBuf::from("schedule.yaml"), PathBuf::from),
            tages_news_url: var("TAGES_NEWS_URL").unwrap_or_else(|| TAGES_NEWS_URL.to_string()),
            site_base_url: var("SITE_BASE_URL").unwrap_or_else(|| BASE_URL.to_string()),
            http_timeout_secs: parse_or(var("HTTP_TIMEOUT_SECS"), 30),
            request_timeout_secs: parse_or(var("REQUEST_TIMEOUT_SECS"), 10),
            mirror_dir: var("MIRROR_DIR").map(PathBuf::from),
            log_dir: var("LOG_DIR").map(PathBuf::from),
            log_json: var("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }

    /// Scraper settings derived from this configuration.
    #[must_use]
    pub fn scraper_config(&self) -> ScraperConfig {
        ScraperConfig {
            page_url: self.tages_news_url.clone(),
            base_url: self.site_base_url.clone(),
            timeout_secs: self.http_timeout_secs,
        }
    }

    /// Logging settings derived from this configuration.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            json: self.log_json,
            log_dir: self.log_dir.clone(),
        }
    }
}

/// `/data/weather.json` inside the container, `data/weather.json` otherwise.
fn default_data_file() -> PathBuf {
    let container = Path::new(CONTAINER_DATA_DIR);
    if container.is_dir() {
        container.join(DATA_FILE_NAME)
    } else {
        Path::new("data").join(DATA_FILE_NAME)
    }
}

/// Parses `value` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let Ok(config) = load(&[]) else {
            panic!("defaults must load");
        };
        assert_eq!(config.listen_addr.port(), 8000);
        assert_eq!(config.schedule_file, PathBuf::from("schedule.yaml"));
        assert_eq!(config.tages_news_url, TAGES_NEWS_URL);
        assert_eq!(config.site_base_url, BASE_URL);
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.data_file.ends_with("data/weather.json"));
        assert!(config.mirror_dir.is_none());
        assert!(!config.log_json);
    }

    #[test]
    fn variables_override_defaults() {
        let Ok(config) = load(&[
            ("LISTEN_ADDR", "127.0.0.1:9000"),
            ("DATA_FILE", "/tmp/w.json"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("MIRROR_DIR", "docs"),
            ("LOG_FORMAT", "JSON"),
        ]) else {
            panic!("config must load");
        };
        assert_eq!(config.listen_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(config.data_file, PathBuf::from("/tmp/w.json"));
        assert_eq!(config.scraper_config().timeout_secs, 5);
        assert_eq!(config.mirror_dir, Some(PathBuf::from("docs")));
        assert!(config.log_config().json);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let Ok(config) = load(&[("HTTP_TIMEOUT_SECS", "soon"), ("MIRROR_DIR", "  ")]) else {
            panic!("config must load");
        };
        assert_eq!(config.http_timeout_secs, 30);
        assert!(config.mirror_dir.is_none());
    }

    #[test]
    fn invalid_listen_addr_is_rejected() {
        let result = load(&[("LISTEN_ADDR", "not-an-address")]);
        assert!(matches!(result, Err(ConfigError::ListenAddr { .. })));
    }
}
