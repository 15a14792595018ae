use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::model::PublicationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    Created,
    Skipped,
    Failed,
}

/// Write `<papers_dir>/<filename>` for a record unless that file already exists.
pub fn emit(record: &PublicationRecord, papers_dir: &Path) -> EmitOutcome {
    let filename = record.filename();
    let path = papers_dir.join(&filename);

    if path.exists() {
        info!("Skipping {} (already exists)", filename);
        return EmitOutcome::Skipped;
    }

    match write_new(&path, &render(record)) {
        Ok(true) => {
            info!("Created: {}", filename);
            EmitOutcome::Created
        }
        Ok(false) => {
            info!("Skipping {} (already exists)", filename);
            EmitOutcome::Skipped
        }
        Err(e) => {
            error!("Error creating {}: {:#}", filename, e);
            EmitOutcome::Failed
        }
    }
}

/// Create-new write. `Ok(false)` when someone else got there first.
fn write_new(path: &Path, content: &str) -> Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("open {}", path.display())),
    };
    file.write_all(content.as_bytes())
        .with_context(|| format!("write {}", path.display()))?;
    Ok(true)
}

/// Front-matter block followed by the abstract section.
pub fn render(record: &PublicationRecord) -> String {
    let mut fields: Vec<(&str, String)> = vec![
        ("name", record.title.clone()),
        ("category", record.category.to_string()),
        ("year", record.year.clone().unwrap_or_else(|| "Unknown".to_string())),
    ];
    if let Some(date) = record.date() {
        fields.push(("date", date));
    }
    if !record.authors.is_empty() {
        fields.push(("authors", record.authors.clone()));
    }
    if let Some(journal) = record.journal.as_ref().filter(|j| !j.is_empty()) {
        fields.push(("journal", journal.clone()));
    }
    if let Some(link) = record.link() {
        fields.push(("link", link));
    }
    if let Some(isbn) = record.isbn.as_ref().filter(|i| !i.is_empty()) {
        fields.push(("isbn", isbn.clone()));
    }

    let mut out = String::from("---\n");
    for (key, value) in fields {
        out.push_str(&format!("{}: {}\n", key, yaml_value(&value)));
    }
    out.push_str("---\n\n# Abstract\n");
    match record.abstract_text.as_deref().filter(|a| !a.is_empty()) {
        Some(text) => out.push_str(text),
        None => out.push_str("*No abstract available.*"),
    }
    out.push('\n');
    out
}

/// Quote values that would otherwise break front-matter parsing.
fn yaml_value(value: &str) -> String {
    if value.contains(['[', '{', ':']) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}
