//! Data models for the three tools' output documents.
//!
//! This module defines the request-scoped records each pipeline produces:
//! - [`SearchResult`]: one parsed Google search hit
//! - [`ChannelVideo`] / [`ChannelListing`]: a channel video and the
//!   envelope document around the filtered/sorted listing
//! - [`TranscriptResult`]: a video transcript with its language metadata
//!
//! Serialization shapes match the JSON documents the tools print, so the
//! structs serialize directly with two-space pretty printing and nothing
//! is post-processed. Records never outlive a single process run.

use serde::Serialize;

/// A single search result parsed out of the proxy's markdown rendering.
///
/// URLs are canonicalized (query string and fragment stripped) before the
/// result is accepted, and results are de-duplicated by that canonical URL
/// within one response.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Cleaned result title, never empty.
    pub title: String,
    /// Canonicalized result URL.
    pub url: String,
    /// Description found in the lines below the result header, possibly empty.
    pub description: String,
}

/// One video row in a channel listing.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelVideo {
    /// 1-based position after filtering, sorting, and limiting.
    pub index: usize,
    pub id: String,
    pub title: String,
    /// Canonical watch URL built from the video id.
    pub url: String,
    /// Duration in whole seconds; 0 when the extractor reported none.
    pub duration: u64,
    /// Duration as `H:MM:SS` or `M:SS`.
    pub duration_human: String,
    /// View count; 0 when the extractor reported none.
    pub views: u64,
    /// `YYYYMMDD` upload date, present only in full-metadata mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    /// First 200 characters of the description, `...`-terminated when cut.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_snippet: Option<String>,
}

/// The channel listing document: channel metadata plus the videos that
/// survived filtering, sorting, and limiting.
#[derive(Debug, Serialize)]
pub struct ChannelListing {
    pub channel: String,
    pub channel_id: String,
    /// Listing URL with the content-type suffix stripped.
    pub channel_url: String,
    /// "videos", "shorts", or "streams".
    pub content_type: String,
    /// Entry count before filtering.
    pub total_count: usize,
    /// Entry count actually present in `videos`.
    pub returned_count: usize,
    /// The sort key that was applied.
    pub sort: String,
    /// The search filter, `null` when none was given.
    pub search: Option<String>,
    pub videos: Vec<ChannelVideo>,
}

/// A fetched transcript with the metadata needed to interpret it.
#[derive(Debug, Serialize)]
pub struct TranscriptResult {
    pub title: String,
    pub video_id: String,
    pub channel: String,
    /// Video duration in whole seconds.
    pub duration: u64,
    /// The caption language that was selected.
    pub language: String,
    /// Every language code offered by the video, manual and automatic,
    /// in the order the upstream maps listed them.
    pub available_languages: Vec<String>,
    /// Newline-joined caption lines, consecutive duplicates removed.
    pub transcript: String,
}
