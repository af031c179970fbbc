//! Command-line entry point
//!
//! ```text
//! imdb-top-ratings --count 20 --output-dir out
//! RUST_LOG=debug imdb-top-ratings --config ratings.json
//! ```

use clap::Parser;
use imdb_top_ratings::{Config, Pipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "imdb-top-ratings",
    version,
    about = "Scrape the IMDb Top 250, add Oscar counts and write adjusted ratings to CSV"
)]
struct Cli {
    /// Number of movies to process (1-250); defaults to the configured limit
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    count: Option<i64>,

    /// JSON configuration file
    #[arg(long, env = "IMDB_TOP_RATINGS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory the CSV files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Site root (for mirrors and testing)
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of detail pages requested at once
    #[arg(long)]
    max_concurrent: Option<usize>,
}

impl Cli {
    fn into_config(self) -> imdb_top_ratings::Result<(Config, i64)> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(dir) = self.output_dir {
            config.output.directory = dir;
        }
        if let Some(base_url) = self.base_url {
            config.scrape.base_url = base_url;
        }
        if let Some(secs) = self.timeout {
            config.scrape.fetch_timeout = (secs > 0).then_some(Duration::from_secs(secs));
        }
        if let Some(limit) = self.max_concurrent {
            config.scrape.max_concurrent_fetches = Some(limit);
        }

        let count = self.count.unwrap_or_else(|| i64::from(config.limit));
        Ok((config, count))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> imdb_top_ratings::Result<()> {
    let (config, count) = cli.into_config()?;
    let report = Pipeline::new(config)?.run(count).await?;

    for path in &report.written {
        tracing::info!(path = %path.display(), "output ready");
    }
    Ok(())
}
