use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::classify::Category;
use crate::model::PublicationRecord;

/// One element of `papers.json`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub name: String,
    pub title: String,
    pub category: Category,
    pub year: String,
    pub authors: String,
    pub journal: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub filename: String,
    pub slug: String,
}

impl From<&PublicationRecord> for IndexEntry {
    fn from(r: &PublicationRecord) -> Self {
        let slug = r.slug();
        Self {
            name: r.title.clone(),
            title: r.title.clone(),
            category: r.category,
            year: r.year.clone().unwrap_or_else(|| "Unknown".to_string()),
            authors: r.authors.clone(),
            journal: r.journal.clone(),
            abstract_text: r.abstract_text.clone(),
            doi: r.doi.clone(),
            isbn: r.isbn.clone(),
            url: r.url.clone(),
            date: r.date(),
            link: r.link(),
            filename: slug.clone(),
            slug,
        }
    }
}

/// Serialize `entries` once and overwrite every path with the same bytes.
pub fn write_index(entries: &[IndexEntry], paths: &[PathBuf]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).context("Failed to serialize index")?;

    for path in paths {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {} entries to {}", entries.len(), path.display());
    }
    Ok(())
}
