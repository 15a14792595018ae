use scraper::Html;

use super::{element_text, normalize_ws, selector};
use crate::model::PublicationSummary;

const HANDLE_MARKER: &str = "/handle/";
const EVENTS_CSS: &str =
    r#"a[href*="/handle/"], h5[class="mb-1 text-secondary"], p[class="mb-1"]"#;

/// Structural events of the list page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Handle(String),
    Title(String),
    AuthorLine(String),
}

/// Accumulates the current title/handle and emits a summary at each author line.
///
/// Title and handle stay set until a newer one replaces them, so an author line
/// that is not preceded by its own title reuses the previous one.
#[derive(Default)]
struct ListScanner {
    title: Option<String>,
    handle: Option<String>,
    out: Vec<PublicationSummary>,
}

impl ListScanner {
    fn feed(&mut self, event: Event) {
        match event {
            Event::Handle(href) => self.handle = Some(href),
            // a blank heading still replaces the previous title
            Event::Title(text) => self.title = Some(text).filter(|t| !t.is_empty()),
            Event::AuthorLine(line) => {
                let line = normalize_ws(&line);
                let (Some(title), Some(handle)) = (&self.title, &self.handle) else {
                    return;
                };
                let Some((year, authors)) = line.split_once(' ') else {
                    return;
                };
                self.out.push(PublicationSummary {
                    title: title.clone(),
                    authors: format_authors(authors),
                    year: Some(year.to_string()),
                    handle: handle.clone(),
                });
            }
        }
    }
}

/// Extract every publication summary from the researcher's list page.
pub fn parse_list(html: &str) -> Vec<PublicationSummary> {
    let doc = Html::parse_document(html);
    let sel = selector(EVENTS_CSS);
    let mut scanner = ListScanner::default();

    for el in doc.select(&sel) {
        let event = match el.value().name() {
            "a" => match el.value().attr("href") {
                Some(href) if href.contains(HANDLE_MARKER) => Event::Handle(href.to_string()),
                _ => continue,
            },
            "h5" => Event::Title(element_text(el)),
            _ => {
                // the line is complete only at its closing tag, so handles inside it count
                for a in el.select(&sel).filter(|a| a.value().name() == "a") {
                    if let Some(href) = a.value().attr("href") {
                        scanner.feed(Event::Handle(href.to_string()));
                    }
                }
                Event::AuthorLine(el.text().collect())
            }
        };
        scanner.feed(event);
    }

    scanner.out
}

/// `"Smith, John; Doe, Jane"` → `"John Smith, Jane Doe"`.
pub fn format_authors(raw: &str) -> String {
    let mut names = Vec::new();
    for group in raw.split(';') {
        let items: Vec<&str> = group.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
        for pair in items.chunks(2) {
            match pair {
                [last, first] => names.push(format!("{} {}", first, last)),
                [single] => names.push(single.to_string()),
                _ => {}
            }
        }
    }
    names.join(", ")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(handle: &str, title: &str, line: &str) -> String {
        format!(
            r#"<div class="card"><a href="{handle}"><h5 class="mb-1 text-secondary">{title}</h5></a>
               <p class="mb-1">{line}</p></div>"#
        )
    }

    #[test]
    fn author_formatting() {
        assert_eq!(format_authors("Smith, John; Doe, Jane"), "John Smith, Jane Doe");
        assert_eq!(format_authors("Smith, John, Rossi, Mario"), "John Smith, Mario Rossi");
        assert_eq!(format_authors("Smith, John; Consortium"), "John Smith, Consortium");
        assert_eq!(format_authors("Smith, John, Leftover"), "John Smith, Leftover");
        assert_eq!(format_authors("Smith, John;"), "John Smith");
    }

    #[test]
    fn author_line_with_year() {
        let html = entry("/handle/10807/1", "Test Paper", "2021 Smith, John; Doe, Jane");
        let pubs = parse_list(&html);
        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].year.as_deref(), Some("2021"));
        assert_eq!(pubs[0].authors, "John Smith, Jane Doe");
        assert_eq!(pubs[0].title, "Test Paper");
        assert_eq!(pubs[0].handle, "/handle/10807/1");
    }

    #[test]
    fn first_token_is_always_the_year() {
        let html = entry("/handle/1", "T", "n.d. Smith, John");
        let pubs = parse_list(&html);
        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].year.as_deref(), Some("n.d."));
        assert_eq!(pubs[0].authors, "John Smith");
    }

    #[test]
    fn year_without_authors_is_skipped() {
        assert!(parse_list(&entry("/handle/1", "T", "2021")).is_empty());
        assert!(parse_list(&entry("/handle/1", "T", "  2021 \n ")).is_empty());
    }

    #[test]
    fn handle_inside_author_line_counts() {
        let html = r#"<h5 class="mb-1 text-secondary">T</h5>
                      <p class="mb-1">2020 <a href="/handle/9">Doe, Jane</a></p>"#;
        let pubs = parse_list(html);
        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].handle, "/handle/9");
        assert_eq!(pubs[0].authors, "Jane Doe");
    }

    #[test]
    fn multiline_markup_is_normalized() {
        let html = entry("/handle/1", "\n  Spaced   <em>Title</em>\n", "2019\n   Rossi,\n Mario");
        let pubs = parse_list(&html);
        assert_eq!(pubs[0].title, "Spaced   Title");
        assert_eq!(pubs[0].year.as_deref(), Some("2019"));
        assert_eq!(pubs[0].authors, "Mario Rossi");
    }

    #[test]
    fn skips_entries_missing_parts() {
        // no handle anywhere yet
        let html = r#"<h5 class="mb-1 text-secondary">Orphan</h5><p class="mb-1">2020 Doe, Jane</p>"#;
        assert!(parse_list(html).is_empty());

        // unrelated links and classes are ignored
        let html = r#"<a href="/cris/rp/1">x</a><h5 class="mb-1 text-secondary">T</h5>
                      <p class="mb-1 small">2020 Doe, Jane</p>"#;
        assert!(parse_list(html).is_empty());

        let html = entry("/handle/1", "T", "   ");
        assert!(parse_list(&html).is_empty());

        // blank title counts as missing
        let html = entry("/handle/1", "  ", "2020 Doe, Jane");
        assert!(parse_list(&html).is_empty());

        // and it clears the title of the entry before it
        let html = format!("{}{}", entry("/handle/1", "Real", "2020 Doe, Jane"), entry("/handle/2", " ", "2021 Roe, Ann"));
        let pubs = parse_list(&html);
        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].title, "Real");
    }

    #[test]
    fn title_and_handle_carry_over() {
        let html = format!(
            "{}<p class=\"mb-1\">2020 Rossi, Mario</p>",
            entry("/handle/1", "Shared", "2020 Doe, Jane")
        );
        let pubs = parse_list(&html);
        assert_eq!(pubs.len(), 2);
        assert_eq!(pubs[1].title, "Shared");
        assert_eq!(pubs[1].handle, "/handle/1");
        assert_eq!(pubs[1].authors, "Mario Rossi");
    }

    #[test]
    fn fixture_page() {
        let html = std::fs::read_to_string("tests/fixtures/list.html").unwrap();
        let pubs = parse_list(&html);
        assert_eq!(pubs.len(), 3);
        assert_eq!(pubs[0].title, "Test Paper");
        assert_eq!(pubs[0].authors, "Jane Doe");
        assert_eq!(pubs[1].authors, "Mario Rossi, Anna Bianchi, Luca Verdi");
        assert_eq!(pubs[2].handle, "/handle/10807/3003");
        assert_eq!(pubs[2].year.as_deref(), Some("2018"));
    }
}
