use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Journal Article")]
    JournalArticle,
    #[serde(rename = "Pre-print")]
    Preprint,
    #[serde(rename = "Conference Paper")]
    ConferencePaper,
    #[serde(rename = "Book Chapter")]
    BookChapter,
    #[serde(rename = "Publication")]
    Publication,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::JournalArticle => "Journal Article",
            Category::Preprint => "Pre-print",
            Category::ConferencePaper => "Conference Paper",
            Category::BookChapter => "Book Chapter",
            Category::Publication => "Publication",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Guess the publication type from the journal name, falling back to the title.
pub fn classify(journal: Option<&str>, title: &str) -> Category {
    let title = title.to_lowercase();

    match journal.map(str::trim).filter(|j| !j.is_empty()) {
        Some(journal) => {
            let journal = journal.to_lowercase();
            match journal.as_str() {
                j if j.contains("arxiv") || j.contains("preprint") => Category::Preprint,
                j if j.contains("conference") || j.contains("proceedings") => {
                    Category::ConferencePaper
                }
                // title "chapter" beats a journal name on purpose
                j if j.contains("book") || title.contains("chapter") => Category::BookChapter,
                _ => Category::JournalArticle,
            }
        }
        None => match title.as_str() {
            t if t.contains("conference") || t.contains("proceedings") => Category::ConferencePaper,
            t if t.contains("book") || t.contains("chapter") => Category::BookChapter,
            _ => Category::Publication,
        },
    }
}
