//! PDF text extraction for the Tages-News bulletin.
//!
//! Only the first page carries the weather table; later pages hold event
//! listings and are ignored.

use lopdf::Document;
use lopdf::content::{Content, Operation};

use crate::error::ScrapeError;

/// Returns the text of page 1 of the PDF in `bytes`, one visual line per
/// text line.
///
/// Generators often write a whole table inside one text object and move
/// between rows with `Td`, `TD`, `T*`, `Tm`, `'` or `"`. Each of those
/// starts a new line here, as does the end of a text object.
///
/// # Errors
///
/// Returns [`ScrapeError::Pdf`] if the bytes are not a readable PDF and
/// [`ScrapeError::EmptyPdf`] if the document has no pages.
pub fn extract_first_page_text(bytes: &[u8]) -> Result<String, ScrapeError> {
    let mut doc = Document::load_mem(bytes)?;

    let pages = doc.get_pages();
    let Some((&first_page, &page_id)) = pages.iter().next() else {
        return Err(ScrapeError::EmptyPdf);
    };

    tracing::debug!(page_count = pages.len(), "pdf loaded");

    let content = Content::decode(&doc.get_page_content(page_id)?)?;
    let lines = Content {
        operations: break_text_lines(content.operations),
    };
    doc.change_page_content(page_id, lines.encode()?)?;

    let text = doc.extract_text(&[first_page])?;
    Ok(text)
}

/// Ends and reopens the text object at every line move so text extraction
/// emits a line break there. Positioning operands are dropped; only the
/// order of the shown strings matters for parsing.
fn break_text_lines(operations: Vec<Operation>) -> Vec<Operation> {
    let mut out = Vec::with_capacity(operations.len());
    let mut in_text = false;

    for op in operations {
        let operator = op.operator.clone();
        match operator.as_str() {
            "BT" => {
                in_text = true;
                out.push(op);
            }
            "ET" => {
                in_text = false;
                out.push(op);
            }
            "Td" | "TD" | "T*" | "Tm" if in_text => push_line_break(&mut out),
            // ' shows its string on the next line, " does the same after
            // setting word and character spacing
            "'" | "\"" if in_text => {
                push_line_break(&mut out);
                if let Some(string) = op.operands.into_iter().last() {
                    out.push(Operation::new("Tj", vec![string]));
                }
            }
            _ => out.push(op),
        }
    }

    out
}

fn push_line_break(out: &mut Vec<Operation>) {
    out.push(Operation::new("ET", vec![]));
    out.push(Operation::new("BT", vec![]));
}


#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::test_support::{
        SAMPLE_BULLETIN, bulletin_pdf, quote_operator_pdf, single_block_pdf,
    };
    use super::*;
    use crate::scrape::extract_weather_data;

    fn text_lines(bytes: &[u8]) -> Vec<String> {
        let Ok(text) = extract_first_page_text(bytes) else {
            panic!("extraction failed");
        };
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn extracts_first_page_lines() {
        let bytes = bulletin_pdf(SAMPLE_BULLETIN);
        let Ok(text) = extract_first_page_text(&bytes) else {
            panic!("extraction failed");
        };
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert!(lines.contains(&"TAGES-NEWS - 22.11.2025"));
        assert!(lines.contains(&"durchschnittliche Schneehöhe"));
        assert!(lines.contains(&"-5°C"));
    }

    #[test]
    fn line_moves_inside_one_text_object_break_lines() {
        let lines = text_lines(&single_block_pdf(SAMPLE_BULLETIN));
        assert_eq!(lines, SAMPLE_BULLETIN);
    }

    #[test]
    fn quote_operator_starts_a_new_line() {
        let lines = text_lines(&quote_operator_pdf(SAMPLE_BULLETIN));
        assert_eq!(lines, SAMPLE_BULLETIN);
    }

    #[test]
    fn single_block_bulletin_yields_exact_fields() {
        let Ok(text) = extract_first_page_text(&single_block_pdf(SAMPLE_BULLETIN)) else {
            panic!("extraction failed");
        };
        let data = extract_weather_data(&text);
        assert_eq!(data.date, "2025-11-22");
        assert_eq!(data.update_time, "08:00Uhr");
        assert_eq!(data.temperature, "-5°C");
        assert_eq!(data.weather_condition, "sonnig");
        assert_eq!(data.snow_depth, "20 cm");
        assert_eq!(data.snow_type, "Pulver");
        assert_eq!(data.last_snowfall, "20.11.2025");
    }

    #[test]
    fn garbage_is_a_pdf_error() {
        let result = extract_first_page_text(b"%PDF-1.4...");
        assert!(matches!(result, Err(ScrapeError::Pdf(_))));
    }
}
