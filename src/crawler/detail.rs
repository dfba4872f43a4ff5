//! Posting detail extraction
//!
//! Every field is looked up independently; a missing element leaves that
//! field empty and never fails the record.

use crate::state::{CandidateLink, JobRecord};
use crate::HarvestError;
use scraper::{Html, Selector};

/// Print-only text the site injects at the top of every posting body
pub const QR_CODE_ARTIFACT: &str = "QR Code Link to This Post";

const TITLE: &str = "span#titletextonly";
const DESCRIPTION: &str = "section#postingbody";
const COMPENSATION: &str = ".attrgroup .remuneration .valu";
const EMPLOYMENT_TYPE: &str = ".attrgroup .employment_type .valu";
const LOCATION: &str = ".postingtitletext > span:last-child";
const COMPANY: &str = "h2.company-name";
const POST_DATE: &str = "p.postinginfo time";

/// Builds a record from a posting page
///
/// # Errors
///
/// Returns `HarvestError::Parse` only when the page is blank; a page with
/// none of the expected elements still produces a record with empty fields.
pub fn extract_record(html: &str, link: &CandidateLink<'_>) -> Result<JobRecord, HarvestError> {
    if html.trim().is_empty() {
        return Err(HarvestError::Parse {
            url: link.url.to_string(),
            message: "empty page".to_string(),
        });
    }

    let document = Html::parse_document(html);
    let mut record = JobRecord::new(link.url.as_str(), link.partition);

    record.title = select_text(&document, TITLE);
    record.description = select_block_text(&document, DESCRIPTION)
        .map(|body| strip_artifact(&body))
        .unwrap_or_default();
    record.compensation = select_text(&document, COMPENSATION);
    record.employment_type = select_text(&document, EMPLOYMENT_TYPE);
    record.location = select_text(&document, LOCATION)
        .trim_matches(|c| c == '(' || c == ')')
        .trim()
        .to_string();
    record.company = select_text(&document, COMPANY);
    record.post_date = select_attr(&document, POST_DATE, "datetime");

    Ok(record)
}

/// Text of the first match with whitespace collapsed to single spaces
fn select_text(document: &Html, css: &str) -> String {
    let Ok(selector) = Selector::parse(css) else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// Text of the first match, one trimmed line per text node
fn select_block_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let element = document.select(&selector).next()?;
    Some(tidy_lines(&element.text().collect::<Vec<_>>().join("\n")))
}

fn select_attr(document: &Html, css: &str, attr: &str) -> String {
    let Ok(selector) = Selector::parse(css) else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Removes the QR-code artifact and re-tidies the surrounding text
pub fn strip_artifact(description: &str) -> String {
    if description.contains(QR_CODE_ARTIFACT) {
        tidy_lines(&description.replace(QR_CODE_ARTIFACT, ""))
    } else {
        description.trim().to_string()
    }
}

/// Drops blank lines and closes the gap the artifact left inside a line
fn tidy_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
