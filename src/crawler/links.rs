//! Listing page link extraction
//!
//! Pulls one posting link out of each result card on a listing page,
//! absolutizes it against the partition's origin, and shuffles the result so
//! a quota-limited prefix is a random sample rather than the newest posts.

use crate::state::{CandidateLink, Partition};
use rand::seq::SliceRandom;
use rand::Rng;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Result card containers across the site's old and current listing markup
const RESULT_CARD_SELECTOR: &str = "div.result-info, li.cl-static-search-result, div.cl-search-result";

/// Extracts shuffled candidate links from a listing page
///
/// Returns an empty list when the page has no result cards. Each card
/// contributes at most its first link, and repeated URLs are kept once.
pub fn extract_links<'a, R: Rng + ?Sized>(
    html: &str,
    partition: &'a Partition,
    rng: &mut R,
) -> Vec<CandidateLink<'a>> {
    let mut links = card_links(html, partition.origin())
        .into_iter()
        .map(|url| CandidateLink { url, partition })
        .collect::<Vec<_>>();
    links.shuffle(rng);
    links
}

/// Absolute link URLs in page order, one per result card
fn card_links(html: &str, origin: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let (Ok(card_selector), Ok(anchor_selector)) =
        (Selector::parse(RESULT_CARD_SELECTOR), Selector::parse("a[href]"))
    else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for card in document.select(&card_selector) {
        let Some(href) = card
            .select(&anchor_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        if let Some(url) = resolve_link(href, origin) {
            if seen.insert(url.as_str().to_string()) {
                urls.push(url);
            }
        }
    }

    urls
}

/// Resolves an href against the origin, keeping only http(s) results
fn resolve_link(href: &str, origin: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let url = origin.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}
