//! Human-readable stdout listings.

use itertools::Itertools;

use crate::error::ToolError;
use crate::models::{ChannelListing, SearchResult};
use crate::utils::{group_thousands, truncate_chars};

/// Print search results as `## title` blocks with URL and description.
pub fn print_search_results(results: &[SearchResult]) {
    for result in results {
        println!("## {}", result.title);
        println!("{}", result.url);
        if !result.description.is_empty() {
            println!("{}", result.description);
        }
        println!();
    }
}

/// Print a channel listing: a short header followed by one block per
/// video. Titles are cut at 50 characters and zero view counts render as
/// `N/A`.
pub fn print_channel_listing(listing: &ChannelListing) {
    println!("Channel: {}", listing.channel);
    println!("Total {}: {}", listing.content_type, listing.total_count);
    println!(
        "Showing: {} (sorted by {})",
        listing.returned_count, listing.sort
    );
    if let Some(term) = &listing.search {
        println!("Search: '{term}'");
    }
    println!("{}", "-".repeat(60));

    for video in &listing.videos {
        let views = if video.views > 0 {
            group_thousands(video.views)
        } else {
            "N/A".to_string()
        };
        println!(
            "{:3}. [{:>8}] {}",
            video.index,
            video.duration_human,
            truncate_chars(&video.title, 50)
        );
        println!("     {views} views | {}", video.url);
        println!();
    }
}

/// Print only the video ids, one per line.
pub fn print_video_ids(listing: &ChannelListing) {
    for video in &listing.videos {
        println!("{}", video.id);
    }
}

/// Print the available caption languages, one per indented line.
pub fn print_language_list(languages: &[String]) {
    println!("Available languages:");
    for lang in languages {
        println!("  {lang}");
    }
}

/// Print an error for a human, with the available-language list appended
/// when the failure was a language lookup.
pub fn eprint_error(err: &ToolError) {
    eprintln!("Error: {err}");
    if let ToolError::LanguageNotFound { available, .. } = err {
        eprintln!("Available: {}", available.iter().join(", "));
    }
}
