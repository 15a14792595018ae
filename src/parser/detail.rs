use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::{element_text, selector};
use crate::model::PublicationDetail;

static CITATION_DOI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"doi:([^\s\]]+)").unwrap());
// `doi.org` host is skipped so the capture starts at the DOI itself
static LINK_DOI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"doi(?:\.org)?[./]([^\s"'<>]+)"#).unwrap());
static RAW_DOI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"citation_doi["']?\s+content=["']([^"']+)"#).unwrap());
// escaped form as served, or already decoded by the attribute parser
static CITATION_JOURNAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&lt;&lt;([^&]+)&gt;&gt;|<<([^&]+?)>>").unwrap());
static RAW_JOURNAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&lt;&lt;([^&]+)&gt;&gt;").unwrap());
static RAW_ABSTRACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<p[^>]*class="[^"]*abstract[^"]*"[^>]*>(.*?)</p>"#).unwrap()
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static ISBN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)ISBN[:\s]+([0-9\-X]+)").unwrap());

const ABSTRACT_CSS: &str = r#"p[class="searchIndexItemDescription abstractEng"]"#;

/// Extract metadata from a publication detail page. Missing fields stay `None`.
///
/// `page_url` is the resolved address of the page; it becomes the canonical URL
/// when the page links to no external resource.
pub fn parse_detail(html: &str, page_url: &str) -> PublicationDetail {
    let doc = Html::parse_document(html);

    let mut citation_doi = None;
    let mut citation_journal = None;
    for el in doc.select(&selector(r#"meta[name*="bibliographicCitation"]"#)) {
        let Some(content) = el.value().attr("content") else { continue };
        if citation_doi.is_none() {
            citation_doi = capture(&CITATION_DOI_RE, content);
        }
        if citation_journal.is_none() {
            citation_journal = CITATION_JOURNAL_RE
                .captures(content)
                .and_then(|c| c.get(1).or_else(|| c.get(2)))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());
        }
    }

    let meta_doi = doc
        .select(&selector(r#"meta[name*="citation_doi"]"#))
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(String::from);

    let mut link_doi = None;
    let mut url = None;
    for el in doc.select(&selector("a[href]")) {
        let Some(href) = el.value().attr("href") else { continue };
        if href.contains("doi.org") {
            if link_doi.is_none() {
                link_doi = capture(&LINK_DOI_RE, href);
            }
        } else if href.starts_with("http") && url.is_none() {
            url = Some(href.to_string());
        }
    }

    let doi = meta_doi
        .or(citation_doi)
        .or(link_doi)
        .or_else(|| capture(&RAW_DOI_RE, html));

    let journal = citation_journal.or_else(|| capture(&RAW_JOURNAL_RE, html));

    let abstract_text = doc
        .select(&selector(ABSTRACT_CSS))
        .map(element_text)
        .find(|t| !t.is_empty())
        .or_else(|| raw_abstract(html));

    PublicationDetail {
        doi,
        isbn: capture(&ISBN_RE, html),
        abstract_text,
        journal,
        url: url.or_else(|| Some(page_url.to_string())),
    }
}

/// First capture group, trimmed, if non-empty.
fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn raw_abstract(html: &str) -> Option<String> {
    let inner = RAW_ABSTRACT_RE.captures(html)?.get(1)?.as_str();
    let text = TAG_RE.replace_all(inner, "").trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ── Tests ──
