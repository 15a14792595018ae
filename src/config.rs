use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};

pub const LIST_URL: &str = "https://publicatt.unicatt.it/cris/rp/rp74098";
pub const BASE_URL: &str = "https://publicatt.unicatt.it";
pub const PAPERS_DIR: &str = "_papers";
pub const DATA_JSON: &str = "_data/papers.json";
pub const ASSETS_JSON: &str = "assets/papers.json";
pub const USER_AGENT: &str = concat!("iris_papers/", env!("CARGO_PKG_VERSION"));

const TIMEOUT_SECS: u64 = 30;
const CONCURRENCY: usize = 4;
const MAX_RETRIES: u32 = 2;
const BASE_BACKOFF_MS: u64 = 1000;

/// Everything a run needs to know about where to read from and write to.
#[derive(Debug, Clone)]
pub struct Config {
    pub list_url: String,
    pub base_url: String,
    pub papers_dir: PathBuf,
    /// The same index is written to every path in this list.
    pub json_paths: Vec<PathBuf>,
    pub timeout: Duration,
    pub user_agent: String,
    pub concurrency: usize,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_url: LIST_URL.to_string(),
            base_url: BASE_URL.to_string(),
            papers_dir: PathBuf::from(PAPERS_DIR),
            json_paths: vec![PathBuf::from(DATA_JSON), PathBuf::from(ASSETS_JSON)],
            timeout: Duration::from_secs(TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            concurrency: CONCURRENCY,
            max_retries: MAX_RETRIES,
            retry_backoff: Duration::from_millis(BASE_BACKOFF_MS),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        for (field, url) in [("list URL", &self.list_url), ("base URL", &self.base_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("{} must be an absolute http(s) URL, got {:?}", field, url);
            }
        }
        if self.json_paths.is_empty() {
            bail!("at least one JSON output path is required");
        }
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        if self.timeout.is_zero() {
            bail!("request timeout must be greater than zero");
        }
        Ok(())
    }

    /// Resolve a detail-page handle against the base URL.
    pub fn resolve_handle(&self, handle: &str) -> String {
        if handle.starts_with("http://") || handle.starts_with("https://") {
            return handle.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if handle.starts_with('/') {
            format!("{}{}", base, handle)
        } else {
            format!("{}/{}", base, handle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.json_paths.len(), 2);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn resolve_handle_inserts_single_slash() {
        let cfg = Config::default();
        assert_eq!(
            cfg.resolve_handle("/handle/10807/1"),
            "https://publicatt.unicatt.it/handle/10807/1"
        );
        assert_eq!(
            cfg.resolve_handle("handle/10807/1"),
            "https://publicatt.unicatt.it/handle/10807/1"
        );
    }

    #[test]
    fn resolve_handle_keeps_absolute_urls() {
        let cfg = Config::default();
        assert_eq!(
            cfg.resolve_handle("https://other.example/handle/1"),
            "https://other.example/handle/1"
        );
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = Config { concurrency: 0, ..Config::default() };
        assert!(cfg.validate().is_err());

        let cfg = Config { list_url: "publicatt.unicatt.it".into(), ..Config::default() };
        assert!(cfg.validate().is_err());

        let cfg = Config { json_paths: Vec::new(), ..Config::default() };
        assert!(cfg.validate().is_err());
    }
}
