//! Seam around the external video-metadata extractor.
//!
//! The channel and transcript tools never talk to the video site directly;
//! everything they need comes from the `yt-dlp` executable, which is an
//! external collaborator rather than part of this crate. The module keeps
//! that boundary behind a trait so the listing/selection logic can be
//! exercised against canned dumps in tests.
//!
//! # Architecture
//!
//! - [`VideoExtractor`]: trait exposing the two operations the tools need
//! - [`YtDlp`]: runs `yt-dlp -J` as a subprocess and deserializes the dump
//!
//! A non-zero exit status becomes [`ToolError::Extractor`] carrying the
//! subprocess stderr. Output that fails to deserialize is reported the
//! same way rather than as a panic.

use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::error::{Result, ToolError};

/// A channel listing as dumped by the extractor.
///
/// Field pairs mirror the extractor's own fallbacks: `channel` is the
/// display name with `uploader` as the older field, `channel_id` likewise
/// falls back to `uploader_id`.
#[derive(Debug, Deserialize)]
pub struct ChannelDump {
    pub channel: Option<String>,
    pub uploader: Option<String>,
    pub channel_id: Option<String>,
    pub uploader_id: Option<String>,
    /// Entries may contain `null` holes when the extractor skipped a video.
    #[serde(default)]
    pub entries: Vec<Option<ChannelEntry>>,
}

impl ChannelDump {
    pub fn channel_name(&self) -> String {
        self.channel
            .clone()
            .or_else(|| self.uploader.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn channel_id(&self) -> String {
        self.channel_id
            .clone()
            .or_else(|| self.uploader_id.clone())
            .unwrap_or_default()
    }
}

/// One video entry in a channel dump. In flat mode only partial metadata
/// is present; `upload_date` in particular requires a full extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub view_count: Option<u64>,
    pub description: Option<String>,
    pub upload_date: Option<String>,
}

/// A single-video dump, carrying the caption track maps.
///
/// The two caption maps are kept as ordered JSON maps (not typed structs)
/// because language selection depends on the upstream key order: "first
/// available language" means first in map order.
#[derive(Debug, Deserialize)]
pub struct VideoDump {
    pub id: Option<String>,
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub channel: Option<String>,
    pub uploader: Option<String>,
    pub language: Option<String>,
    pub original_language: Option<String>,
    #[serde(default)]
    pub automatic_captions: Map<String, Value>,
    #[serde(default)]
    pub subtitles: Map<String, Value>,
}

impl VideoDump {
    pub fn channel_name(&self) -> String {
        self.channel
            .clone()
            .or_else(|| self.uploader.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// The video's declared original language, if the extractor knew it.
    pub fn declared_language(&self) -> Option<String> {
        self.language
            .clone()
            .or_else(|| self.original_language.clone())
    }
}

/// One downloadable caption track within a language.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    pub url: String,
    pub ext: Option<String>,
}

/// Interface to the external extraction capability.
///
/// Exactly the two operations the tools need: enumerate a channel's
/// listing page and fetch a single video's metadata (including caption
/// track maps). Implementations are free to shell out, hit an API, or
/// replay fixtures.
pub trait VideoExtractor {
    /// Fetch a channel listing. `flat` requests the fast enumeration mode
    /// that returns partial per-video metadata; passing `false` performs a
    /// full extraction (slow, but includes upload dates).
    async fn channel_listing(&self, url: &str, flat: bool) -> Result<ChannelDump>;

    /// Fetch metadata for a single video, including its caption maps.
    async fn video_info(&self, url: &str) -> Result<VideoDump>;
}

/// [`VideoExtractor`] backed by the `yt-dlp` executable.
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new() -> Self {
        Self {
            program: "yt-dlp".to_string(),
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn dump_json(&self, url: &str, flat: bool) -> Result<Vec<u8>> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-J").arg("--no-warnings").arg("--ignore-errors");
        if flat {
            cmd.arg("--flat-playlist");
        }
        cmd.arg(url);

        let output = cmd.output().await?;
        if !output.status.success() {
            return Err(ToolError::Extractor {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(bytes = output.stdout.len(), "Extractor dump received");
        Ok(output.stdout)
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoExtractor for YtDlp {
    #[instrument(level = "info", skip(self))]
    async fn channel_listing(&self, url: &str, flat: bool) -> Result<ChannelDump> {
        let stdout = self.dump_json(url, flat).await?;
        let dump: ChannelDump =
            serde_json::from_slice(&stdout).map_err(|_| ToolError::NoChannelInfo)?;
        info!(entries = dump.entries.len(), "Extracted channel listing");
        Ok(dump)
    }

    #[instrument(level = "info", skip(self))]
    async fn video_info(&self, url: &str) -> Result<VideoDump> {
        let stdout = self.dump_json(url, false).await?;
        let dump: VideoDump = serde_json::from_slice(&stdout).map_err(|e| ToolError::Extractor {
            reason: format!("undecodable extractor output: {e}"),
        })?;
        info!(
            auto_captions = dump.automatic_captions.len(),
            subtitles = dump.subtitles.len(),
            "Extracted video info"
        );
        Ok(dump)
    }
}
