//! Locates the dated Tages-News PDF link on the resort's download page.

use scraper::{Html, Selector};

/// Link text marker for the daily bulletin.
const LINK_TEXT_MARKER: &str = "Tages-News";

/// Href fragments used by the site's download redirector.
const DOWNLOAD_HREF_MARKERS: [&str; 3] = ["media%2Fdownload", "media/download", "r/"];

/// Returns the absolute URL of the first dated bulletin link in `html`.
///
/// A link qualifies when its text mentions `Tages-News` together with at
/// least one digit (the date), and its `href` points at the download
/// redirector. The undated "Statischer Link" entry is skipped. Relative
/// hrefs are resolved against `base_url`.
#[must_use]
pub fn find_pdf_link(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return None;
    };

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = anchor.text().collect::<String>();
        let text = text.trim();

        if is_dated_bulletin(text) && is_download_href(href) {
            let link = absolutize(href, base_url);
            tracing::debug!(%link, text, "found bulletin link");
            return Some(link);
        }
    }

    None
}

fn is_dated_bulletin(text: &str) -> bool {
    text.contains(LINK_TEXT_MARKER) && text.chars().any(|c| c.is_ascii_digit())
}

fn is_download_href(href: &str) -> bool {
    DOWNLOAD_HREF_MARKERS
        .iter()
        .any(|marker| href.contains(marker))
}

fn absolutize(href: &str, base_url: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{href}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.altenberg.de";

    #[test]
    fn finds_relative_link_and_resolves_it() {
        let html = r#"<html><a href="/r/123?page=media%2Fdownload">Tages-News 22.11.2025</a></html>"#;
        assert_eq!(
            find_pdf_link(html, BASE).as_deref(),
            Some("https://www.altenberg.de/r/123?page=media%2Fdownload")
        );
    }

    #[test]
    fn returns_none_without_bulletin_link() {
        let html = r#"<html><a href="/other">Other Link</a></html>"#;
        assert!(find_pdf_link(html, BASE).is_none());
    }

    #[test]
    fn skips_static_link_without_date() {
        let html = r#"
        <html>
            <body>
                <div class="abo-download-area">
                    <a href="/r/91329422?page=media/download" target="_blank" class="abo-download-link">
                        Tages-News Statischer Link für Leistungsträger
                    </a>
                    <a href="/r/622108495?page=media%2Fdownload" target="_blank" class="abo-download-link">
                        Tages-News 24.11.2025
                    </a>
                </div>
            </body>
        </html>
        "#;
        assert_eq!(
            find_pdf_link(html, BASE).as_deref(),
            Some("https://www.altenberg.de/r/622108495?page=media%2Fdownload")
        );
    }

    #[test]
    fn static_link_alone_is_not_enough() {
        let html = r#"
        <div class="abo-download-area">
            <a href="/r/91329422?page=media/download">Tages-News Statischer Link für Leistungsträger</a>
        </div>
        "#;
        assert!(find_pdf_link(html, BASE).is_none());
    }

    #[test]
    fn dated_link_must_point_at_download() {
        let html = r#"<a href="/news/archive">Tages-News 24.11.2025</a>"#;
        assert!(find_pdf_link(html, BASE).is_none());
    }

    #[test]
    fn absolute_href_is_kept() {
        let html = r#"<a href="https://cdn.example.org/media/download/x.pdf">Tages-News 01.12.2025</a>"#;
        assert_eq!(
            find_pdf_link(html, BASE).as_deref(),
            Some("https://cdn.example.org/media/download/x.pdf")
        );
    }

    #[test]
    fn base_with_trailing_slash_does_not_double_up() {
        assert_eq!(
            absolutize("/r/1", "http://localhost:8080/"),
            "http://localhost:8080/r/1"
        );
        assert_eq!(absolutize("r/1", "http://localhost:8080"), "http://localhost:8080/r/1");
    }
}
