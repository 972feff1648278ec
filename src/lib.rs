//! # Web Text Tools
//!
//! Three small command-line utilities that fetch web content and reformat
//! it into clean text or JSON:
//!
//! - `jina-google-search`: Google search results via the r.jina.ai
//!   markdown-rendering proxy, parsed into titles, canonical URLs, and
//!   descriptions
//! - `youtube-channel`: a channel's video/shorts/streams listing with
//!   filtering, sorting, and limiting
//! - `youtube-transcript`: a video's caption track reduced to plain
//!   transcript text, with language selection
//!
//! ## Usage
//!
//! ```sh
//! jina-google-search "rust async traits" --num 20 --json
//! youtube-channel "@HealthyGamerGG" --sort views --limit 10
//! youtube-transcript "https://youtube.com/watch?v=..." --lang zh-Hant
//! ```
//!
//! ## Architecture
//!
//! Each tool is an independent pipeline: normalize the input, perform one
//! blocking fetch (an HTTP GET, or a `yt-dlp` subprocess run behind the
//! [`extractor::VideoExtractor`] seam), clean the payload with
//! line-oriented heuristics, and emit either a human-readable listing or
//! a pretty-printed JSON document. There is no persistent state, no
//! retry logic, and no concurrency; a failed fetch ends the run with
//! exit status 1.

pub mod channel;
pub mod error;
pub mod extractor;
pub mod models;
pub mod outputs;
pub mod search;
pub mod transcript;
pub mod utils;
