use std::path::PathBuf;

use clap::Parser;

use leadmap_core::RunConfig;
use leadmap_webdriver::WebDriverSession;

#[derive(Debug, Parser)]
#[command(name = "leadmap")]
#[command(about = "Harvest business leads from a map-directory search into CSV")]
struct Cli {
    /// Search query, e.g. "Consultancies in Istanbul"
    query: String,

    /// Maximum number of records to collect
    #[arg(long, default_value_t = 100)]
    max_results: usize,

    /// Maximum number of result pages to traverse
    #[arg(long, default_value_t = 5)]
    max_pages: usize,

    /// WebDriver endpoint to drive the browser through
    #[arg(long, env = "LEADMAP_WEBDRIVER_URL", default_value = "http://localhost:9515")]
    webdriver_url: String,

    /// Run the browser with a visible window (headless by default)
    #[arg(long)]
    headed: bool,

    /// Write the CSV here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = RunConfig::new(&cli.query, cli.max_results, cli.max_pages)?;

    let session = WebDriverSession::connect(&cli.webdriver_url, !cli.headed).await?;

    // Progress goes to stderr so stdout stays a clean CSV stream.
    let progress = |message: &str| eprintln!("{message}");
    let csv = leadmap_harvester::harvest(Box::new(session), &config, Some(&progress)).await?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &csv)?;
            tracing::info!(path = %path.display(), "CSV written");
        }
        None => print!("{csv}"),
    }

    Ok(())
}
