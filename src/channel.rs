//! Channel listing: identifier normalization, filtering, sorting, limiting.
//!
//! A channel can be named by `@handle`, a bare handle, a `UC…` channel id,
//! or a full URL. All forms normalize to a canonical listing URL whose
//! suffix (`/videos`, `/shorts`, `/streams`) selects the content type. The
//! listing itself comes from the extractor seam; everything after that is
//! linear filtering and a stable sort over the in-memory rows.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::error::{Result, ToolError};
use crate::extractor::{ChannelEntry, VideoExtractor};
use crate::models::{ChannelListing, ChannelVideo};
use crate::utils::{format_duration, truncate_chars};

/// An existing listing suffix at the end of a channel URL.
static LISTING_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(videos|shorts|streams)/?$").unwrap());

/// Sort order for the listing. `Recency` applies no sort at all and keeps
/// the platform's delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    Recency,
    Views,
    Duration,
    #[value(name = "duration_asc")]
    DurationAsc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recency => "recency",
            SortKey::Views => "views",
            SortKey::Duration => "duration",
            SortKey::DurationAsc => "duration_asc",
        }
    }
}

/// Which channel tab to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ContentType {
    #[default]
    Videos,
    Shorts,
    Streams,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Videos => "videos",
            ContentType::Shorts => "shorts",
            ContentType::Streams => "streams",
        }
    }
}

/// Listing parameters, straight from the CLI.
#[derive(Debug, Clone, Default)]
pub struct ListingOptions {
    /// `None` means unlimited.
    pub limit: Option<usize>,
    pub sort: SortKey,
    /// Case-insensitive substring filter over title and snippet.
    pub search: Option<String>,
    pub content_type: ContentType,
    /// Full-metadata mode: slower, but entries carry upload dates.
    pub with_dates: bool,
}

/// Map a user-supplied channel identifier to a canonical listing URL.
///
/// - full URL: an explicit listing suffix is kept, otherwise `/videos` is
///   appended
/// - `@handle`: expanded under youtube.com
/// - `UC…` 24-character token: treated as a channel id
/// - anything else: assumed to be a handle missing its `@`
pub fn normalize_channel_url(channel: &str) -> String {
    let channel = channel.trim();

    if channel.starts_with("http") {
        if !channel.contains("/videos")
            && !channel.contains("/shorts")
            && !channel.contains("/streams")
        {
            return format!("{}/videos", channel.trim_end_matches('/'));
        }
        return channel.to_string();
    }

    if let Some(handle) = channel.strip_prefix('@') {
        return format!("https://www.youtube.com/@{handle}/videos");
    }

    if channel.starts_with("UC") && channel.chars().count() == 24 {
        return format!("https://www.youtube.com/channel/{channel}/videos");
    }

    format!("https://www.youtube.com/@{channel}/videos")
}

/// Split a normalized listing URL into its suffix-free base and the
/// listing URL for the requested content type.
pub fn retarget_listing_url(channel_url: &str, content_type: ContentType) -> (String, String) {
    let base = LISTING_SUFFIX_RE.replace(channel_url, "").into_owned();
    let listing = format!("{}/{}", base, content_type.as_str());
    (base, listing)
}

/// Fetch a channel listing and reduce it per the given options.
#[instrument(level = "info", skip(extractor, opts))]
pub async fn list_videos<E: VideoExtractor>(
    extractor: &E,
    channel_url: &str,
    opts: &ListingOptions,
) -> Result<ChannelListing> {
    let (base, listing_url) = retarget_listing_url(channel_url, opts.content_type);

    info!(url = %listing_url, "Fetching channel listing");
    let dump = extractor.channel_listing(&listing_url, !opts.with_dates).await?;

    assemble_listing(dump, &base, opts)
}

/// Turn a raw channel dump into the output document: rows are built from
/// the non-null entries, filtered, stably sorted, limited, and renumbered
/// 1-based in final order.
fn assemble_listing(
    dump: crate::extractor::ChannelDump,
    base_url: &str,
    opts: &ListingOptions,
) -> Result<ChannelListing> {
    if dump.entries.is_empty() {
        return Err(ToolError::NoVideos);
    }

    let total_count = dump.entries.len();
    info!(count = total_count, "Found channel entries");

    let mut videos: Vec<ChannelVideo> = dump
        .entries
        .iter()
        .flatten()
        .map(|entry| video_from_entry(entry, opts.with_dates))
        .collect();

    if let Some(term) = opts.search.as_deref() {
        let needle = term.to_lowercase();
        videos.retain(|v| {
            v.title.to_lowercase().contains(&needle)
                || v.description_snippet
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        });
        debug!(count = videos.len(), term, "Filtered channel videos");
    }

    match opts.sort {
        SortKey::Recency => {}
        SortKey::Views => videos.sort_by(|a, b| b.views.cmp(&a.views)),
        SortKey::Duration => videos.sort_by(|a, b| b.duration.cmp(&a.duration)),
        SortKey::DurationAsc => videos.sort_by(|a, b| a.duration.cmp(&b.duration)),
    }

    if let Some(limit) = opts.limit {
        if limit > 0 {
            videos.truncate(limit);
        }
    }

    for (i, video) in videos.iter_mut().enumerate() {
        video.index = i + 1;
    }

    Ok(ChannelListing {
        channel: dump.channel_name(),
        channel_id: dump.channel_id(),
        channel_url: base_url.to_string(),
        content_type: opts.content_type.as_str().to_string(),
        total_count,
        returned_count: videos.len(),
        sort: opts.sort.as_str().to_string(),
        search: opts.search.clone(),
        videos,
    })
}

fn video_from_entry(entry: &ChannelEntry, with_dates: bool) -> ChannelVideo {
    let id = entry.id.clone().unwrap_or_default();
    let duration = entry.duration.unwrap_or(0.0) as u64;

    let description_snippet = entry
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| {
            if d.chars().count() > 200 {
                format!("{}...", truncate_chars(d, 200))
            } else {
                d.to_string()
            }
        });

    ChannelVideo {
        index: 0,
        url: format!("https://youtube.com/watch?v={id}"),
        id,
        title: entry.title.clone().unwrap_or_else(|| "Unknown".to_string()),
        duration,
        duration_human: format_duration(duration),
        views: entry.view_count.unwrap_or(0),
        upload_date: if with_dates {
            entry.upload_date.clone()
        } else {
            None
        },
        description_snippet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ChannelDump;

    fn entry(id: &str, title: &str, duration: f64, views: u64) -> ChannelEntry {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "duration": duration,
            "view_count": views,
        }))
        .unwrap()
    }

    fn dump_of(entries: Vec<Option<ChannelEntry>>) -> ChannelDump {
        let mut dump: ChannelDump =
            serde_json::from_str(r#"{"channel": "Test Channel", "channel_id": "UCx", "entries": []}"#)
                .unwrap();
        dump.entries = entries;
        dump
    }

    #[test]
    fn test_normalize_handle_with_at() {
        assert_eq!(
            normalize_channel_url("@HealthyGamerGG"),
            "https://www.youtube.com/@HealthyGamerGG/videos"
        );
    }

    #[test]
    fn test_normalize_bare_handle() {
        assert_eq!(
            normalize_channel_url("HealthyGamerGG"),
            "https://www.youtube.com/@HealthyGamerGG/videos"
        );
    }

    #[test]
    fn test_normalize_channel_id() {
        assert_eq!(
            normalize_channel_url("UC1234567890123456789012"),
            "https://www.youtube.com/channel/UC1234567890123456789012/videos"
        );
        // 23 characters is not a channel id, just an odd handle
        assert_eq!(
            normalize_channel_url("UC123456789012345678901"),
            "https://www.youtube.com/@UC123456789012345678901/videos"
        );
    }

    #[test]
    fn test_normalize_full_url_without_suffix() {
        assert_eq!(
            normalize_channel_url("https://youtube.com/@name/"),
            "https://youtube.com/@name/videos"
        );
    }

    #[test]
    fn test_normalize_full_url_with_suffix_unchanged() {
        assert_eq!(
            normalize_channel_url("https://youtube.com/@name/shorts"),
            "https://youtube.com/@name/shorts"
        );
    }

    #[test]
    fn test_retarget_listing_url() {
        let (base, listing) =
            retarget_listing_url("https://www.youtube.com/@name/videos", ContentType::Shorts);
        assert_eq!(base, "https://www.youtube.com/@name");
        assert_eq!(listing, "https://www.youtube.com/@name/shorts");

        let (_, listing) =
            retarget_listing_url("https://www.youtube.com/@name/streams/", ContentType::Videos);
        assert_eq!(listing, "https://www.youtube.com/@name/videos");
    }

    #[test]
    fn test_sort_views_descending() {
        let dump = dump_of(vec![
            Some(entry("aaaaaaaaaaa", "A", 10.0, 10)),
            Some(entry("bbbbbbbbbbb", "B", 20.0, 5)),
            Some(entry("ccccccccccc", "C", 30.0, 20)),
        ]);
        let listing = assemble_listing(
            dump,
            "base",
            &ListingOptions {
                sort: SortKey::Views,
                ..Default::default()
            },
        )
        .unwrap();
        let views: Vec<u64> = listing.videos.iter().map(|v| v.views).collect();
        assert_eq!(views, [20, 10, 5]);
    }

    #[test]
    fn test_sort_duration_asc() {
        let dump = dump_of(vec![
            Some(entry("aaaaaaaaaaa", "A", 30.0, 1)),
            Some(entry("bbbbbbbbbbb", "B", 10.0, 2)),
            Some(entry("ccccccccccc", "C", 20.0, 3)),
        ]);
        let listing = assemble_listing(
            dump,
            "base",
            &ListingOptions {
                sort: SortKey::DurationAsc,
                ..Default::default()
            },
        )
        .unwrap();
        let durations: Vec<u64> = listing.videos.iter().map(|v| v.duration).collect();
        assert_eq!(durations, [10, 20, 30]);
    }

    #[test]
    fn test_default_order_preserved() {
        let dump = dump_of(vec![
            Some(entry("aaaaaaaaaaa", "First", 30.0, 1)),
            Some(entry("bbbbbbbbbbb", "Second", 10.0, 99)),
        ]);
        let listing = assemble_listing(dump, "base", &ListingOptions::default()).unwrap();
        assert_eq!(listing.videos[0].title, "First");
        assert_eq!(listing.videos[1].title, "Second");
    }

    #[test]
    fn test_limit_zero_is_unlimited_and_limit_takes_head() {
        let entries: Vec<Option<ChannelEntry>> = (0..5)
            .map(|i| Some(entry("aaaaaaaaaaa", &format!("V{i}"), 1.0, i)))
            .collect();

        let all = assemble_listing(dump_of(entries.clone()), "base", &ListingOptions::default())
            .unwrap();
        assert_eq!(all.returned_count, 5);

        let limited = assemble_listing(
            dump_of(entries),
            "base",
            &ListingOptions {
                limit: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(limited.returned_count, 2);
        assert_eq!(limited.videos[0].title, "V0");
        assert_eq!(limited.videos[1].title, "V1");
    }

    #[test]
    fn test_search_filter_case_insensitive() {
        let mut with_desc = entry("aaaaaaaaaaa", "Other topic", 1.0, 1);
        with_desc.description = Some("Long talk about ANXIETY management".to_string());
        let dump = dump_of(vec![
            Some(entry("bbbbbbbbbbb", "Dealing with Anxiety", 1.0, 1)),
            Some(with_desc),
            Some(entry("ccccccccccc", "Unrelated", 1.0, 1)),
        ]);
        let listing = assemble_listing(
            dump,
            "base",
            &ListingOptions {
                search: Some("anxiety".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(listing.returned_count, 2);
        assert_eq!(listing.total_count, 3);
    }

    #[test]
    fn test_indices_renumbered_after_sort_and_limit() {
        let dump = dump_of(vec![
            Some(entry("aaaaaaaaaaa", "A", 1.0, 10)),
            Some(entry("bbbbbbbbbbb", "B", 1.0, 30)),
            Some(entry("ccccccccccc", "C", 1.0, 20)),
        ]);
        let listing = assemble_listing(
            dump,
            "base",
            &ListingOptions {
                sort: SortKey::Views,
                limit: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        let indices: Vec<usize> = listing.videos.iter().map(|v| v.index).collect();
        assert_eq!(indices, [1, 2]);
        assert_eq!(listing.videos[0].title, "B");
    }

    #[test]
    fn test_null_entries_counted_but_skipped() {
        let dump = dump_of(vec![
            None,
            Some(entry("aaaaaaaaaaa", "Only", 1.0, 1)),
        ]);
        let listing = assemble_listing(dump, "base", &ListingOptions::default()).unwrap();
        assert_eq!(listing.total_count, 2);
        assert_eq!(listing.returned_count, 1);
    }

    #[test]
    fn test_empty_entries_is_an_error() {
        let err = assemble_listing(dump_of(vec![]), "base", &ListingOptions::default())
            .unwrap_err();
        assert!(matches!(err, ToolError::NoVideos));
    }

    #[test]
    fn test_snippet_truncated_at_200_chars() {
        let mut long = entry("aaaaaaaaaaa", "Long", 1.0, 1);
        long.description = Some("d".repeat(250));
        let dump = dump_of(vec![Some(long)]);
        let listing = assemble_listing(dump, "base", &ListingOptions::default()).unwrap();
        let snippet = listing.videos[0].description_snippet.as_deref().unwrap();
        assert_eq!(snippet.len(), 203);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_upload_date_only_in_full_mode() {
        let mut dated = entry("aaaaaaaaaaa", "Dated", 1.0, 1);
        dated.upload_date = Some("20240115".to_string());
        let listing = assemble_listing(
            dump_of(vec![Some(dated.clone())]),
            "base",
            &ListingOptions::default(),
        )
        .unwrap();
        assert!(listing.videos[0].upload_date.is_none());

        let listing = assemble_listing(
            dump_of(vec![Some(dated)]),
            "base",
            &ListingOptions {
                with_dates: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(listing.videos[0].upload_date.as_deref(), Some("20240115"));
    }
}
