//! Google search CLI: fetch a results page through the r.jina.ai
//! markdown-rendering proxy and print the parsed results.

use clap::Parser;

use web_text_tools::error::Result;
use web_text_tools::outputs::{human, json};
use web_text_tools::search;
use web_text_tools::utils::init_tracing;

/// Command-line arguments for the search tool.
///
/// # Examples
///
/// ```sh
/// jina-google-search "your search query"
/// jina-google-search "your search query" --num 20
/// jina-google-search "your search query" --json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about = "Google search via the r.jina.ai rendering proxy")]
struct Cli {
    /// Search query
    query: String,

    /// Number of results to request
    #[arg(long)]
    num: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    init_tracing(args.json);

    if let Err(e) = run(&args).await {
        eprintln!("Error fetching results: {e}");
        std::process::exit(1);
    }
}

async fn run(args: &Cli) -> Result<()> {
    let content = search::fetch_search(&args.query, args.num).await?;
    let results = search::parse_results(&content);

    if args.json {
        json::print_pretty(&results)?;
    } else {
        human::print_search_results(&results);
    }
    Ok(())
}
