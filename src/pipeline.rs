use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::fetch::Fetcher;
use crate::model::{PublicationDetail, PublicationRecord, PublicationSummary};
use crate::output::{emit, write_index, EmitOutcome, IndexEntry};
use crate::parser::{parse_detail, parse_list};

/// How a run ended. Fatal I/O errors are returned as `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed(RunCounts),
    ListFetchFailed,
    NoPublications,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCounts {
    pub total: usize,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunCounts {
    pub fn print(&self, config: &Config) {
        let paths: Vec<String> = config.json_paths.iter().map(|p| p.display().to_string()).collect();
        println!("\n{}", "=".repeat(60));
        println!("Summary:");
        println!("  Processed: {} publication(s)", self.total);
        println!("  Created: {} new publication(s)", self.created);
        println!("  Skipped: {} existing publication(s)", self.skipped);
        if self.failed > 0 {
            println!("  Failed:  {} publication(s)", self.failed);
        }
        println!("  JSON file written to: {}", paths.join(" and "));
    }
}

/// List → details → classify → markdown + JSON index.
pub async fn run(config: &Config) -> Result<RunStatus> {
    fs::create_dir_all(&config.papers_dir)
        .with_context(|| format!("Failed to create {}", config.papers_dir.display()))?;

    let fetcher = Fetcher::new(config)?;

    info!("Fetching publications from {}", config.list_url);
    let summaries = match fetch_list(&fetcher, &config.list_url).await {
        Ok(s) => s,
        Err(e) => {
            error!("Error fetching publication list: {:#}", e);
            return Ok(RunStatus::ListFetchFailed);
        }
    };
    if summaries.is_empty() {
        println!("No publications found.");
        return Ok(RunStatus::NoPublications);
    }
    println!("Found {} publication(s)", summaries.len());

    let details = fetch_details(&fetcher, config, &summaries).await;
    let records: Vec<PublicationRecord> = summaries
        .into_iter()
        .zip(details)
        .map(|(summary, detail)| PublicationRecord::new(summary, detail, None))
        .collect();

    let mut counts = RunCounts { total: records.len(), ..Default::default() };
    let mut entries = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        info!(
            "[{}/{}] Processing: {} ({})",
            i + 1,
            records.len(),
            truncate(&record.title, 60),
            record.handle
        );
        entries.push(IndexEntry::from(record));
        match emit(record, &config.papers_dir) {
            EmitOutcome::Created => counts.created += 1,
            EmitOutcome::Skipped => counts.skipped += 1,
            EmitOutcome::Failed => counts.failed += 1,
        }
    }

    write_index(&entries, &config.json_paths)?;
    Ok(RunStatus::Completed(counts))
}

pub async fn fetch_list(fetcher: &Fetcher, list_url: &str) -> Result<Vec<PublicationSummary>> {
    let html = fetcher.get_html(list_url).await?;
    Ok(parse_list(&html))
}

/// Never fails: a page that cannot be fetched yields an empty detail.
pub async fn fetch_detail(fetcher: &Fetcher, handle: &str, url: &str) -> PublicationDetail {
    match fetcher.get_html(url).await {
        Ok(html) => parse_detail(&html, url),
        Err(e) => {
            warn!("Could not fetch details for {}: {:#}", handle, e);
            PublicationDetail::default()
        }
    }
}

/// Fetch every detail page on a bounded pool. Output order matches `summaries`.
async fn fetch_details(
    fetcher: &Fetcher,
    config: &Config,
    summaries: &[PublicationSummary],
) -> Vec<PublicationDetail> {
    let total = summaries.len();
    let semaphore = Arc::new(Semaphore::new(config.concurrency));

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let (tx, mut rx) = mpsc::channel::<(usize, PublicationDetail)>(config.concurrency * 2);

    for (idx, summary) in summaries.iter().enumerate() {
        let fetcher = fetcher.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();
        let handle = summary.handle.clone();
        let url = config.resolve_handle(&handle);

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else { return };
            let detail = fetch_detail(&fetcher, &handle, &url).await;
            let _ = tx.send((idx, detail)).await;
        });
    }

    // rx closes once every task has dropped its sender
    drop(tx);

    let mut details = vec![PublicationDetail::default(); total];
    while let Some((idx, detail)) = rx.recv().await {
        details[idx] = detail;
        pb.inc(1);
    }

    pb.finish_and_clear();
    details
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──
