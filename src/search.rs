//! Google search via the r.jina.ai markdown-rendering proxy.
//!
//! The proxy renders a Google results page as markdown. Result headers
//! come out as `[### Title ...](URL)` lines, with the description (when
//! Google shows one) somewhere in the next few lines, surrounded by image
//! markup, breadcrumbs, and widget noise. Parsing is a single line scan
//! with a bounded look-ahead window; the thresholds below were calibrated
//! against observed renderings and are kept literal.

use std::collections::HashSet;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::models::SearchResult;
use crate::utils::truncate_for_log;

/// Domains that never carry result content (ad/asset/infrastructure hosts).
const FILTER_DOMAINS: [&str; 5] = [
    "google.com",
    "gstatic.com",
    "ytimg.com",
    "googleapis.com",
    "googleusercontent.com",
];

/// A search-result header: `[### Title](http(s)://...)`. Titles may
/// contain `]`, so the capture is greedy up to the `](http` boundary.
static RESULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[### (.+)\]\((https?://[^)]+)\)$").unwrap());

/// Embedded image markdown and everything after it.
static IMAGE_MD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*!\[.*$").unwrap());

/// Breadcrumb separators and everything after them.
static BREADCRUMB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\\›»].*$").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Query string or fragment and everything after it.
static URL_TRIM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#?].*$").unwrap());

static IMAGE_FILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.(png|jpg|gif|svg)$").unwrap());

/// A line that is just a domain name, e.g. `docs.example.co`.
static BARE_DOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z0-9.-]+\.[a-z]{2,}$").unwrap());

static EMPHASIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_]+)_").unwrap());

static READ_MORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[Read more\].*$").unwrap());

/// A leading `Mon DD, YYYY` date stamp with its trailing dash separator.
static DATE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]{2} \d{1,2}, \d{4} — ").unwrap());

/// Whether a raw result URL should be discarded outright.
fn should_filter(url: &str) -> bool {
    if FILTER_DOMAINS.iter().any(|domain| url.contains(domain)) {
        return true;
    }
    url.starts_with("blob:") || IMAGE_FILE_RE.is_match(url)
}

/// Fetch the markdown rendering of a Google results page.
///
/// The query is percent-encoded into the proxied search URL; `num` adds
/// Google's result-count parameter. This is the one fetch in the crate
/// with an explicit timeout (30 s), since the proxy renders pages on
/// demand and can stall.
#[instrument(level = "info", skip_all, fields(%query))]
pub async fn fetch_search(query: &str, num: Option<u32>) -> Result<String> {
    let encoded = urlencoding::encode(query);
    let mut url = format!("https://r.jina.ai/https://www.google.com/search?q={encoded}");
    if let Some(n) = num {
        url.push_str(&format!("&num={n}"));
    }

    info!(%url, "Fetching search results");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let body = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    debug!(preview = %truncate_for_log(&body, 300), "Received markdown payload");
    Ok(body)
}

/// Parse the proxy's markdown into an ordered, de-duplicated result list.
///
/// A header line opens a candidate; the title and URL are cleaned, the
/// candidate is dropped if it points at a filtered domain, a blob or
/// image asset, repeats an already-seen canonical URL, or cleans down to
/// an empty title. For accepted candidates the next 9 lines are scanned
/// for a description; failing to find one yields an empty description,
/// never an error.
pub fn parse_results(content: &str) -> Vec<SearchResult> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut results = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = RESULT_RE.captures(line) else {
            continue;
        };
        let raw_title = &caps[1];
        let url = &caps[2];

        // Header titles render as "Title ![Image](blob) SiteName URL";
        // keep only the leading title text.
        let title = IMAGE_MD_RE.replace(raw_title, "");
        let title = BREADCRUMB_RE.replace(&title, "");
        let title = WHITESPACE_RE.replace_all(&title, " ");
        let title = title.trim().to_string();

        let clean_url = URL_TRIM_RE.replace(url, "").into_owned();

        if should_filter(url) || seen_urls.contains(&clean_url) || title.is_empty() {
            continue;
        }
        seen_urls.insert(clean_url.clone());

        let description = find_description(&lines, i);

        results.push(SearchResult {
            title,
            url: clean_url,
            description,
        });
    }

    info!(count = results.len(), "Parsed search results");
    results
}

/// Scan up to 9 lines past a result header for a description candidate.
///
/// Link lines, bare URLs, image markup, bullets, feedback-widget text,
/// bare domains, and anything under 30 characters are noise. The first
/// surviving line is cleaned (emphasis markers, trailing read-more links,
/// leading date stamps) and accepted only if more than 30 characters
/// remain. The scan ends early at the next result header or section
/// heading.
fn find_description(lines: &[&str], header_idx: usize) -> String {
    let end = (header_idx + 10).min(lines.len());
    for raw in &lines[header_idx + 1..end] {
        let next_line = raw.trim();

        if RESULT_RE.is_match(next_line) || next_line.starts_with("##") {
            break;
        }

        if next_line.starts_with('[')
            || next_line.starts_with("http")
            || next_line.starts_with("![")
            || next_line.starts_with('*')
            || next_line.to_lowercase().contains("feedback")
            || BARE_DOMAIN_RE.is_match(next_line)
            || next_line.chars().count() < 30
        {
            continue;
        }

        let desc = EMPHASIS_RE.replace_all(next_line, "$1");
        let desc = READ_MORE_RE.replace(&desc, "");
        let desc = DATE_PREFIX_RE.replace(&desc, "");
        let desc = desc.trim();

        if desc.chars().count() > 30 {
            return desc.to_string();
        }
    }

    String::new()
}
