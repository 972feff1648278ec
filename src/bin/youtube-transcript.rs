//! Transcript CLI: download a video's caption track and print it as
//! plain text, with language selection and clipboard support.

use clap::Parser;

use web_text_tools::error::{Result, ToolError};
use web_text_tools::extractor::YtDlp;
use web_text_tools::outputs::{human, json};
use web_text_tools::transcript;
use web_text_tools::utils::init_tracing;

/// Command-line arguments for the transcript tool.
///
/// # Examples
///
/// ```sh
/// youtube-transcript "https://youtube.com/watch?v=..."
/// youtube-transcript "https://youtube.com/watch?v=..." --lang zh-Hant
/// youtube-transcript "https://youtube.com/watch?v=..." --list-langs
/// youtube-transcript "https://youtube.com/watch?v=..." --json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about = "Download YouTube video transcripts")]
struct Cli {
    /// YouTube video URL
    url: String,

    /// Preferred language code (e.g., en, zh-Hant)
    #[arg(short, long)]
    lang: Option<String>,

    /// List available languages instead of printing the transcript
    #[arg(long)]
    list_langs: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Copy transcript to clipboard
    #[arg(long)]
    copy: bool,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    init_tracing(args.quiet || args.json);

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
    // Validate before any fetch; a URL with no video id never leaves the
    // process.
    if transcript::extract_video_id(&args.url).is_none() {
        return Err(ToolError::InvalidVideoUrl);
    }

    let extractor = YtDlp::new();
    let result = transcript::get_transcript(&extractor, &args.url, args.lang.as_deref()).await?;

    if args.list_langs {
        if args.json {
            json::print_pretty(&serde_json::json!({
                "available_languages": result.available_languages,
            }))?;
        } else {
            human::print_language_list(&result.available_languages);
        }
        return Ok(());
    }

    if args.json {
        json::print_pretty(&result)?;
    } else {
        println!("{}", result.transcript);
    }

    if args.copy {
        copy_to_clipboard(&result.transcript);
    }
    Ok(())
}

/// Clipboard copy is best-effort: a missing display server or denied
/// clipboard access downgrades to a warning, never a failed run.
fn copy_to_clipboard(text: &str) {
    let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
    match copied {
        Ok(()) => eprintln!("\nCopied to clipboard!"),
        Err(e) => eprintln!("\nCould not copy to clipboard: {e}"),
    }
}
