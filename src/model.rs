use chrono::NaiveDate;

use crate::classify::{classify, Category};
use crate::slug::sanitize_filename;

/// One entry of the researcher's publication list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationSummary {
    pub title: String,
    pub authors: String,
    pub year: Option<String>,
    pub handle: String,
}

/// Metadata scraped from a publication's own page. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationDetail {
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub url: Option<String>,
}

/// Summary + detail + derived values. The unit of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationRecord {
    pub title: String,
    pub authors: String,
    pub year: Option<String>,
    pub month: Option<u32>,
    pub handle: String,
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub url: Option<String>,
    pub category: Category,
}

impl PublicationRecord {
    pub fn new(summary: PublicationSummary, detail: PublicationDetail, month: Option<u32>) -> Self {
        let category = classify(detail.journal.as_deref(), &summary.title);
        Self {
            title: summary.title,
            authors: summary.authors,
            year: summary.year,
            month,
            handle: summary.handle,
            doi: detail.doi,
            isbn: detail.isbn,
            abstract_text: detail.abstract_text,
            journal: detail.journal,
            url: detail.url,
            category,
        }
    }

    /// `YYYY-MM-01`, only when the year is a real number.
    pub fn date(&self) -> Option<String> {
        let year: i32 = self.year.as_deref()?.trim().parse().ok()?;
        let month = self.month.unwrap_or(1);
        NaiveDate::from_ymd_opt(year, month, 1)
            .or_else(|| NaiveDate::from_ymd_opt(year, 1, 1))
            .map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// DOI link when there is a DOI, otherwise the scraped URL.
    pub fn link(&self) -> Option<String> {
        match (&self.doi, &self.url) {
            (Some(doi), _) if !doi.is_empty() => Some(format!("https://doi.org/{}", doi)),
            (_, Some(url)) if !url.is_empty() => Some(url.clone()),
            _ => None,
        }
    }

    pub fn filename(&self) -> String {
        sanitize_filename(&self.title, self.year.as_deref(), self.month)
    }

    /// Filename without the `.md` extension.
    pub fn slug(&self) -> String {
        let filename = self.filename();
        filename.strip_suffix(".md").unwrap_or(&filename).to_string()
    }
}
