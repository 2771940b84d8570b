//! review-sentiment - Scrape product reviews and chart their sentiment
//!
//! Drives a headless browser through the review pages, scores a random
//! sample with VADER and writes a CSV plus PNG charts.

use anyhow::Result;
use clap::Parser;
use review_sentiment::commands::{AnalyzeCommand, Outcome};
use review_sentiment::config::{Backend, Config};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "review-sentiment",
    version,
    about = "Scrape product reviews, score their sentiment and chart the results",
    long_about = "Collects reviews from a paginated product-review page, samples them, \
                  scores each with VADER and exports a CSV plus sentiment charts."
)]
struct Cli {
    /// Product-review page URL
    #[arg(short, long)]
    url: Option<String>,

    /// Page session backend (webdriver, http)
    #[arg(short, long)]
    backend: Option<Backend>,

    /// WebDriver endpoint (e.g., http://localhost:9515)
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,

    /// Proxy URL for the HTTP backend (e.g., socks5://host:port)
    #[arg(long)]
    proxy: Option<String>,

    /// Maximum number of pages to scrape
    #[arg(short, long)]
    max_pages: Option<usize>,

    /// Number of reviews to sample
    #[arg(short = 'n', long)]
    sample_size: Option<usize>,

    /// Sampling seed
    #[arg(long)]
    seed: Option<u64>,

    /// CSV output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for chart images
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Extra words excluded from the word cloud (comma-separated)
    #[arg(long, value_delimiter = ',')]
    stopwords: Option<Vec<String>>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded config.
    fn apply(self, mut config: Config) -> Config {
        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(webdriver_url) = self.webdriver_url {
            config.webdriver_url = webdriver_url;
        }
        if self.headed {
            config.headless = false;
        }
        if let Some(proxy) = self.proxy {
            config.proxy = Some(proxy);
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(sample_size) = self.sample_size {
            config.sample_size = sample_size;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(chart_dir) = self.chart_dir {
            config.chart_dir = chart_dir;
        }
        if self.no_charts {
            config.charts = false;
        }
        if let Some(words) = self.stopwords {
            config.extra_stopwords.extend(words);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let config = Config::load(cli.config.as_deref())?.with_env();
    let config = cli.apply(config);

    let cmd = AnalyzeCommand::new(config);
    match cmd.execute().await? {
        Outcome::NoReviews { stop } => {
            info!("Stopped: {}", stop);
            std::process::exit(1);
        }
        Outcome::Completed(summary) => {
            info!(
                "Scored {} of {} reviews ({})",
                summary.scored.len(),
                summary.collected,
                summary.stop
            );
            for path in &summary.chart_paths {
                info!("Chart saved as '{}'", path.display());
            }
        }
    }

    Ok(())
}
