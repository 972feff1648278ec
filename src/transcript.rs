//! Transcript extraction from a video's caption tracks.
//!
//! The extractor's video dump carries two caption maps (automatic and
//! manually authored) keyed by language code. Manual tracks win on key
//! collision. Within the selected language a VTT track is preferred; the
//! timed-text formats `srv1`/`srv2`/`srv3`/`json3` are the fallback, in
//! that order. The payload parsers reduce either format to plain caption
//! lines with immediately repeated lines collapsed.
//!
//! Caption URLs occasionally hand back an `#EXTM3U` playlist instead of
//! the subtitle body; the first URL in the playlist is followed
//! best-effort, and the original payload is parsed as-is when the
//! follow-up fetch fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{Result, ToolError};
use crate::extractor::{CaptionTrack, VideoDump, VideoExtractor};
use crate::models::TranscriptResult;

/// The three recognized video URL shapes, applied in order: `v=` or
/// path-segment form, `embed/` form, shortened `youtu.be/` form.
static VIDEO_ID_RES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11}).*").unwrap(),
        Regex::new(r"(?:embed/)([0-9A-Za-z_-]{11})").unwrap(),
        Regex::new(r"(?:youtu\.be/)([0-9A-Za-z_-]{11})").unwrap(),
    ]
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static M3U8_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https://\S+").unwrap());

/// English codes tried when neither a preference nor the video's declared
/// original language picks a caption track.
const ENGLISH_FALLBACKS: [&str; 3] = ["en", "en-US", "en-GB"];

/// Pull the 11-character video id out of a URL. `None` means the URL
/// matches none of the recognized shapes and is an input error.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_RES
        .iter()
        .find_map(|re| re.captures(url).map(|caps| caps[1].to_string()))
}

/// Merge the automatic and manual caption maps. Manual tracks replace
/// automatic ones on key collision without disturbing key order, so
/// "first available language" stays meaningful.
pub fn merged_captions(dump: &VideoDump) -> Map<String, Value> {
    let mut merged = dump.automatic_captions.clone();
    for (lang, tracks) in &dump.subtitles {
        merged.insert(lang.clone(), tracks.clone());
    }
    merged
}

/// Pick the caption language.
///
/// With a preference: exact key match, else case-insensitive substring
/// match over the available codes, else an error carrying the available
/// list. Without one: the video's declared original language when it has
/// captions, else the first English variant present, else the first
/// available language in map order.
pub fn select_language(
    captions: &Map<String, Value>,
    preferred: Option<&str>,
    original: Option<&str>,
) -> Result<String> {
    if let Some(pref) = preferred {
        if captions.contains_key(pref) {
            return Ok(pref.to_string());
        }
        let needle = pref.to_lowercase();
        if let Some(lang) = captions.keys().find(|l| l.to_lowercase().contains(&needle)) {
            return Ok(lang.clone());
        }
        return Err(ToolError::LanguageNotFound {
            requested: pref.to_string(),
            available: captions.keys().cloned().collect(),
        });
    }

    if let Some(orig) = original {
        if captions.contains_key(orig) {
            return Ok(orig.to_string());
        }
    }
    for lang in ENGLISH_FALLBACKS {
        if captions.contains_key(lang) {
            return Ok(lang.to_string());
        }
    }
    // The caller guarantees the map is non-empty.
    Ok(captions.keys().next().cloned().unwrap_or_default())
}

/// Pick the track to download within a language: VTT when present, else
/// the first timed-text format available in preference order.
pub fn select_track(tracks: &[CaptionTrack]) -> Option<(String, String)> {
    if let Some(track) = tracks.iter().find(|t| t.ext.as_deref() == Some("vtt")) {
        return Some((track.url.clone(), "vtt".to_string()));
    }
    for fmt in ["srv1", "srv2", "srv3", "json3"] {
        if let Some(track) = tracks.iter().find(|t| t.ext.as_deref() == Some(fmt)) {
            return Some((track.url.clone(), fmt.to_string()));
        }
    }
    None
}

/// First URL of an `#EXTM3U` playlist payload, when the payload is one.
fn m3u8_target(payload: &str) -> Option<&str> {
    if !payload.starts_with("#EXTM3U") {
        return None;
    }
    M3U8_URL_RE.find(payload).map(|m| m.as_str())
}

/// Follow an M3U8 playlist to the real subtitle body, best-effort. Any
/// failure (unparseable URL, fetch error) keeps the original payload.
async fn resolve_m3u8(client: &reqwest::Client, payload: String) -> String {
    let Some(target) = m3u8_target(&payload) else {
        return payload;
    };
    let Ok(target) = Url::parse(target) else {
        return payload;
    };

    debug!(%target, "Following M3U8 playlist to subtitle payload");
    match client.get(target).send().await {
        Ok(resp) => match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "M3U8 follow-up read failed; parsing playlist text");
                payload
            }
        },
        Err(e) => {
            warn!(error = %e, "M3U8 follow-up fetch failed; parsing playlist text");
            payload
        }
    }
}

/// Reduce a VTT payload to caption lines.
///
/// Header lines, cue timings (`-->`), blanks, and bare cue numbers are
/// dropped; markup tags are stripped; the five standard entities are
/// unescaped; immediately repeated lines collapse to one.
pub fn parse_vtt(text: &str) -> String {
    let mut lines = Vec::new();
    for line in text.split('\n') {
        if line.starts_with("WEBVTT") || line.contains("-->") {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let clean = TAG_RE.replace_all(line, "");
        let clean = unescape_entities(&clean);
        let clean = clean.trim();
        if !clean.is_empty() {
            lines.push(clean.to_string());
        }
    }

    collapse_consecutive(lines).join("\n")
}

/// A JSON3 captions document: timed events carrying text segments.
#[derive(Debug, Deserialize)]
struct Json3Doc {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    utf8: Option<String>,
}

/// Reduce a JSON3 payload to caption lines: per event, concatenate the
/// segment texts, trim, keep non-empty, collapse immediate repeats. A
/// payload that fails to parse as JSON gets the VTT treatment instead.
pub fn parse_json3(text: &str) -> String {
    match serde_json::from_str::<Json3Doc>(text) {
        Ok(doc) => {
            let mut lines = Vec::new();
            for event in doc.events {
                let joined: String = event
                    .segs
                    .iter()
                    .filter_map(|seg| seg.utf8.as_deref())
                    .collect();
                let line = joined.trim();
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
            }
            collapse_consecutive(lines).join("\n")
        }
        Err(e) => {
            debug!(error = %e, "Payload is not JSON3; falling back to VTT parsing");
            parse_vtt(text)
        }
    }
}

fn unescape_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
}

fn collapse_consecutive(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if out.last() != Some(&line) {
            out.push(line);
        }
    }
    out
}

/// Fetch and assemble the transcript for one video.
#[instrument(level = "info", skip(extractor, preferred_lang))]
pub async fn get_transcript<E: VideoExtractor>(
    extractor: &E,
    url: &str,
    preferred_lang: Option<&str>,
) -> Result<TranscriptResult> {
    info!(%url, "Fetching video info");
    let dump = extractor.video_info(url).await?;
    if let Some(title) = dump.title.as_deref() {
        info!(%title, "Video info extracted");
    }

    let captions = merged_captions(&dump);
    if captions.is_empty() {
        return Err(ToolError::NoCaptions);
    }
    let available_languages: Vec<String> = captions.keys().cloned().collect();

    let language = select_language(
        &captions,
        preferred_lang,
        dump.declared_language().as_deref(),
    )?;
    info!(%language, "Using caption language");

    let tracks: Vec<CaptionTrack> = captions
        .get(&language)
        .cloned()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .unwrap_or_default();
    let (track_url, format) = select_track(&tracks).ok_or(ToolError::NoCaptionUrl)?;

    info!(%format, "Downloading subtitles");
    let client = reqwest::Client::new();
    let payload = client
        .get(&track_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let transcript = if format == "json3" {
        parse_json3(&payload)
    } else {
        let payload = resolve_m3u8(&client, payload).await;
        parse_vtt(&payload)
    };

    Ok(TranscriptResult {
        title: dump.title.clone().unwrap_or_else(|| "Unknown".to_string()),
        video_id: dump.id.clone().unwrap_or_default(),
        channel: dump.channel_name(),
        duration: dump.duration.unwrap_or(0.0) as u64,
        language,
        available_languages,
        transcript,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captions_of(json: &str) -> Map<String, Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_video_id_standard_form() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_embed_form() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_short_form() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=30").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_rejects_unrecognized() {
        assert!(extract_video_id("https://example.com").is_none());
        assert!(extract_video_id("not a url at all").is_none());
    }

    #[test]
    fn test_manual_captions_override_automatic() {
        let dump: VideoDump = serde_json::from_str(
            r#"{
                "automatic_captions": {
                    "en": [{"url": "auto", "ext": "vtt"}],
                    "de": [{"url": "auto-de", "ext": "vtt"}]
                },
                "subtitles": {
                    "en": [{"url": "manual", "ext": "vtt"}]
                }
            }"#,
        )
        .unwrap();
        let merged = merged_captions(&dump);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["en"][0]["url"], "manual");
        // Order of existing keys is untouched by the override.
        let keys: Vec<&String> = merged.keys().collect();
        assert_eq!(keys, ["en", "de"]);
    }

    #[test]
    fn test_select_language_exact_preference() {
        let captions = captions_of(r#"{"en": [], "zh-Hant": []}"#);
        assert_eq!(
            select_language(&captions, Some("zh-Hant"), None).unwrap(),
            "zh-Hant"
        );
    }

    #[test]
    fn test_select_language_substring_preference() {
        let captions = captions_of(r#"{"en": [], "zh-Hant": []}"#);
        assert_eq!(select_language(&captions, Some("zh"), None).unwrap(), "zh-Hant");
        assert_eq!(
            select_language(&captions, Some("HANT"), None).unwrap(),
            "zh-Hant"
        );
    }

    #[test]
    fn test_select_language_not_found_lists_available() {
        let captions = captions_of(r#"{"en": [], "de": []}"#);
        let err = select_language(&captions, Some("fr"), None).unwrap_err();
        match err {
            ToolError::LanguageNotFound { requested, available } => {
                assert_eq!(requested, "fr");
                assert_eq!(available, ["en", "de"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_select_language_prefers_declared_original() {
        let captions = captions_of(r#"{"en": [], "de": []}"#);
        assert_eq!(select_language(&captions, None, Some("de")).unwrap(), "de");
    }

    #[test]
    fn test_select_language_english_fallback_chain() {
        let captions = captions_of(r#"{"fr": [], "en-GB": []}"#);
        assert_eq!(select_language(&captions, None, None).unwrap(), "en-GB");
    }

    #[test]
    fn test_select_language_first_available_fallback() {
        let captions = captions_of(r#"{"ja": [], "ko": []}"#);
        assert_eq!(select_language(&captions, None, Some("ru")).unwrap(), "ja");
    }

    #[test]
    fn test_select_track_prefers_vtt() {
        let tracks: Vec<CaptionTrack> = serde_json::from_str(
            r#"[
                {"url": "u-json3", "ext": "json3"},
                {"url": "u-vtt", "ext": "vtt"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            select_track(&tracks),
            Some(("u-vtt".to_string(), "vtt".to_string()))
        );
    }

    #[test]
    fn test_select_track_fallback_preference_order() {
        let tracks: Vec<CaptionTrack> = serde_json::from_str(
            r#"[
                {"url": "u-json3", "ext": "json3"},
                {"url": "u-srv2", "ext": "srv2"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            select_track(&tracks),
            Some(("u-srv2".to_string(), "srv2".to_string()))
        );
    }

    #[test]
    fn test_select_track_none_usable() {
        let tracks: Vec<CaptionTrack> =
            serde_json::from_str(r#"[{"url": "u", "ext": "ttml"}]"#).unwrap();
        assert_eq!(select_track(&tracks), None);
    }

    #[test]
    fn test_parse_vtt_drops_structure_and_collapses_duplicates() {
        let payload = "\
WEBVTT

1
00:00:00.000 --> 00:00:02.000
<c>Hello world</c>

2
00:00:02.000 --> 00:00:04.000
Hello world

3
00:00:04.000 --> 00:00:06.000
Something &amp; something else";
        assert_eq!(
            parse_vtt(payload),
            "Hello world\nSomething & something else"
        );
    }

    #[test]
    fn test_parse_vtt_unescapes_entities() {
        let payload = "a&nbsp;b &lt;tag&gt; &quot;quoted&quot;";
        assert_eq!(parse_vtt(payload), "a b <tag> \"quoted\"");
    }

    #[test]
    fn test_m3u8_target_detection() {
        let playlist = "#EXTM3U\n#EXT-X-VERSION:3\nhttps://example.com/real.vtt\n";
        assert_eq!(m3u8_target(playlist), Some("https://example.com/real.vtt"));
        assert_eq!(m3u8_target("WEBVTT\n"), None);
    }

    #[test]
    fn test_parse_json3_concatenates_segments() {
        let payload = r#"{
            "events": [
                {"segs": [{"utf8": "Hello "}, {"utf8": "world"}]},
                {"tStartMs": 1000},
                {"segs": [{"utf8": "Hello world"}]},
                {"segs": [{"utf8": "  "}]},
                {"segs": [{"utf8": "Next line"}]}
            ]
        }"#;
        assert_eq!(parse_json3(payload), "Hello world\nNext line");
    }

    #[test]
    fn test_parse_json3_falls_back_to_vtt_on_bad_json() {
        let payload = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nPlain caption line";
        assert_eq!(parse_json3(payload), "Plain caption line");
    }

    #[test]
    fn test_collapse_consecutive_keeps_later_repeats() {
        let lines = vec![
            "a".to_string(),
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
        ];
        assert_eq!(collapse_consecutive(lines), ["a", "b", "a"]);
    }
}
