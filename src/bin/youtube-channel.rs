//! Channel listing CLI: enumerate a channel's videos, shorts, or streams
//! with optional filtering, sorting, and limiting.

use clap::Parser;

use web_text_tools::channel::{self, ContentType, ListingOptions, SortKey};
use web_text_tools::error::Result;
use web_text_tools::extractor::YtDlp;
use web_text_tools::outputs::{human, json};
use web_text_tools::utils::init_tracing;

/// Command-line arguments for the channel tool.
///
/// # Examples
///
/// ```sh
/// youtube-channel "@HealthyGamerGG"                  # recent videos
/// youtube-channel "@HealthyGamerGG" --limit 10       # 10 most recent
/// youtube-channel "@HealthyGamerGG" --sort views     # by view count
/// youtube-channel "@HealthyGamerGG" --search anxiety # title/description filter
/// youtube-channel "@HealthyGamerGG" --type shorts    # shorts only
/// youtube-channel "@HealthyGamerGG" --json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about = "Explore a YouTube channel's video listing")]
struct Cli {
    /// YouTube channel URL, @handle, or channel ID
    channel: String,

    /// Number of videos to return (0 for all)
    #[arg(short = 'n', long, default_value_t = 20)]
    limit: usize,

    /// Sort order
    #[arg(short, long, value_enum, default_value = "recency")]
    sort: SortKey,

    /// Filter videos by title or description keyword
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Content type to list
    #[arg(short = 't', long = "type", value_enum, default_value = "videos")]
    content_type: ContentType,

    /// Include upload dates (slower full extraction)
    #[arg(long)]
    with_dates: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Suppress progress messages
    #[arg(long)]
    quiet: bool,

    /// Output only video IDs, one per line
    #[arg(long)]
    ids_only: bool,
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    init_tracing(args.quiet || args.json || args.ids_only);

    if let Err(e) = run(&args).await {
        if args.json {
            json::print_error_document(&e);
        } else {
            human::eprint_error(&e);
        }
        std::process::exit(1);
    }
}

async fn run(args: &Cli) -> Result<()> {
    let channel_url = channel::normalize_channel_url(&args.channel);
    let opts = ListingOptions {
        limit: (args.limit > 0).then_some(args.limit),
        sort: args.sort,
        search: args.search.clone(),
        content_type: args.content_type,
        with_dates: args.with_dates,
    };

    let extractor = YtDlp::new();
    let listing = channel::list_videos(&extractor, &channel_url, &opts).await?;

    if args.ids_only {
        human::print_video_ids(&listing);
    } else if args.json {
        json::print_pretty(&listing)?;
    } else {
        human::print_channel_listing(&listing);
    }
    Ok(())
}
