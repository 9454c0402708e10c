//! Tages-News scraper: page → PDF link → PDF bytes → page-1 text → fields.
//!
//! [`SkiWeatherScraper`] performs the network side and delegates parsing to
//! [`link`], [`pdf`] and [`extract`]. It implements [`WeatherSource`], the
//! seam the scrape service and the scheduler depend on.

pub mod extract;
pub mod link;
pub mod pdf;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::WeatherSnapshot;
use crate::error::ScrapeError;

pub use extract::extract_weather_data;
pub use link::find_pdf_link;
pub use pdf::extract_first_page_text;

/// Site root used to resolve relative download links.
pub const BASE_URL: &str = "https://www.altenberg.de";

/// Page listing the current Tages-News download.
pub const TAGES_NEWS_URL: &str = "https://www.altenberg.de/de/p/-de-p-tages-news-zum-download-47003971-/tages-news-zum-download/47003971/";

/// One scrape attempt producing a fresh, unsaved snapshot.
#[async_trait]
pub trait WeatherSource: Send + Sync + std::fmt::Debug {
    /// Fetches and parses the current bulletin.
    ///
    /// # Errors
    ///
    /// Returns a [`ScrapeError`] if any stage of the attempt fails.
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, ScrapeError>;
}

/// Network settings for [`SkiWeatherScraper`].
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// URL of the page that links the current bulletin.
    pub page_url: String,
    /// Prefix for relative links found on that page.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            page_url: TAGES_NEWS_URL.to_string(),
            base_url: BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Scrapes the Altenberg Tages-News bulletin.
#[derive(Debug, Clone)]
pub struct SkiWeatherScraper {
    http: Client,
    config: ScraperConfig,
}

impl SkiWeatherScraper {
    /// Creates a scraper with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Returns the scraper configuration.
    #[must_use]
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetches the download page and returns the absolute PDF URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] on network failure or non-success status
    /// and [`ScrapeError::LinkNotFound`] if the page has no dated bulletin.
    pub async fn fetch_pdf_url(&self) -> Result<String, ScrapeError> {
        tracing::info!(url = %self.config.page_url, "fetching bulletin page");
        let html = self
            .http
            .get(&self.config.page_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        find_pdf_link(&html, &self.config.base_url).ok_or_else(|| {
            tracing::warn!(url = %self.config.page_url, "bulletin link not found");
            ScrapeError::LinkNotFound(self.config.page_url.clone())
        })
    }

    /// Downloads the PDF at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] on network failure or non-success status.
    pub async fn download_pdf(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        tracing::info!(%url, "downloading bulletin pdf");
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tracing::debug!(bytes = bytes.len(), "pdf downloaded");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl WeatherSource for SkiWeatherScraper {
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, ScrapeError> {
        let url = self.fetch_pdf_url().await?;
        let bytes = self.download_pdf(&url).await?;

        tracing::info!("extracting data from pdf");
        let text = tokio::task::spawn_blocking(move || extract_first_page_text(&bytes))
            .await
            .map_err(|e| ScrapeError::Pdf(format!("extraction task failed: {e}")))??;

        Ok(extract_weather_data(&text))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::pdf::test_support::{SAMPLE_BULLETIN, bulletin_pdf};
    use super::*;

    const PAGE_PATH: &str = "/de/p/tages-news-zum-download";

    fn page_html() -> String {
        r#"
        <html><body>
            <a href="/r/91329422?page=media/download">Tages-News Statischer Link für Leistungsträger</a>
            <a href="/r/622108495?page=media%2Fdownload">Tages-News 22.11.2025</a>
        </body></html>
        "#
        .to_string()
    }

    fn scraper_for(server: &MockServer) -> SkiWeatherScraper {
        let config = ScraperConfig {
            page_url: format!("{}{PAGE_PATH}", server.uri()),
            base_url: server.uri(),
            timeout_secs: 5,
        };
        let Ok(scraper) = SkiWeatherScraper::new(config) else {
            panic!("client build failed");
        };
        scraper
    }

    async fn mount_page(server: &MockServer, body: String) {
        Mock::given(method("GET"))
            .and(path(PAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_pdf_url_resolves_against_base() {
        let server = MockServer::start().await;
        mount_page(&server, page_html()).await;

        let url = scraper_for(&server).fetch_pdf_url().await.ok();
        assert_eq!(
            url,
            Some(format!("{}/r/622108495?page=media%2Fdownload", server.uri()))
        );
    }

    #[tokio::test]
    async fn fetch_pdf_url_without_link_fails() {
        let server = MockServer::start().await;
        mount_page(&server, "<html><a href=\"/other\">Other Link</a></html>".to_string()).await;

        let result = scraper_for(&server).fetch_pdf_url().await;
        assert!(matches!(result, Err(ScrapeError::LinkNotFound(_))));
    }

    #[tokio::test]
    async fn page_error_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PAGE_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = scraper_for(&server).fetch_pdf_url().await;
        assert!(matches!(result, Err(ScrapeError::Http(_))));
    }

    #[tokio::test]
    async fn download_pdf_returns_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4...".to_vec()))
            .mount(&server)
            .await;

        let bytes = scraper_for(&server)
            .download_pdf(&format!("{}/file.pdf", server.uri()))
            .await
            .ok();
        assert_eq!(bytes.as_deref(), Some(&b"%PDF-1.4..."[..]));
    }

    #[tokio::test]
    async fn fetch_snapshot_runs_whole_pipeline() {
        let server = MockServer::start().await;
        mount_page(&server, page_html()).await;
        Mock::given(method("GET"))
            .and(path("/r/622108495"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(bulletin_pdf(SAMPLE_BULLETIN)),
            )
            .mount(&server)
            .await;

        let result = scraper_for(&server).fetch_snapshot().await;
        let Ok(data) = result else {
            panic!("scrape failed: {result:?}");
        };
        assert_eq!(data.date, "2025-11-22");
        assert_eq!(data.temperature, "-5°C");
        assert_eq!(data.weather_condition, "sonnig");
        assert_eq!(data.snow_type, "Pulver");
        assert_eq!(data.snow_depth, "20 cm");
        assert_eq!(data.last_snowfall, "20.11.2025");
        assert_eq!(data.update_time, "08:00Uhr");
    }

    #[tokio::test]
    async fn fetch_snapshot_with_broken_pdf_fails() {
        let server = MockServer::start().await;
        mount_page(&server, page_html()).await;
        Mock::given(method("GET"))
            .and(path("/r/622108495"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not a pdf".to_vec()))
            .mount(&server)
            .await;

        let result = scraper_for(&server).fetch_snapshot().await;
        assert!(matches!(result, Err(ScrapeError::Pdf(_))));
    }
}
