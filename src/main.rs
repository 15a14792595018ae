mod classify;
mod config;
mod fetch;
mod model;
mod output;
mod parser;
mod pipeline;
mod slug;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use config::Config;
use pipeline::RunStatus;

const EXIT_LIST_FETCH_FAILED: u8 = 2;
const EXIT_NO_PUBLICATIONS: u8 = 3;

/// Every flag is optional; without any the compiled-in IRIS defaults are used.
#[derive(Parser)]
#[command(
    name = "iris_papers",
    version,
    about = "Fetch IRIS publications and generate Jekyll paper pages + papers.json"
)]
struct Cli {
    /// Researcher page listing the publications
    #[arg(long)]
    list_url: Option<String>,
    /// Base URL that publication handles are resolved against
    #[arg(long)]
    base_url: Option<String>,
    /// Directory receiving one markdown file per publication
    #[arg(long)]
    papers_dir: Option<PathBuf>,
    /// JSON index output path (repeatable; default: _data/papers.json and assets/papers.json)
    #[arg(long = "json")]
    json_paths: Vec<PathBuf>,
    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,
    /// Max detail pages fetched at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,
    /// Retries for timeouts, 429 and 5xx responses
    #[arg(long)]
    retries: Option<u32>,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut cfg = Config::default();
        if let Some(v) = self.list_url {
            cfg.list_url = v;
        }
        if let Some(v) = self.base_url {
            cfg.base_url = v;
        }
        if let Some(v) = self.papers_dir {
            cfg.papers_dir = v;
        }
        if !self.json_paths.is_empty() {
            cfg.json_paths = self.json_paths;
        }
        if let Some(v) = self.timeout {
            cfg.timeout = Duration::from_secs(v);
        }
        if let Some(v) = self.user_agent {
            cfg.user_agent = v;
        }
        if let Some(v) = self.concurrency {
            cfg.concurrency = v;
        }
        if let Some(v) = self.retries {
            cfg.max_retries = v;
        }
        cfg
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let config = Cli::parse().into_config();
    config.validate()?;

    let code = match pipeline::run(&config).await? {
        RunStatus::Completed(counts) => {
            counts.print(&config);
            ExitCode::SUCCESS
        }
        RunStatus::ListFetchFailed => {
            println!("No publications found.");
            ExitCode::from(EXIT_LIST_FETCH_FAILED)
        }
        RunStatus::NoPublications => ExitCode::from(EXIT_NO_PUBLICATIONS),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(code)
}
