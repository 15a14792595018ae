pub mod detail;
pub mod list;

use scraper::{ElementRef, Selector};

pub use detail::parse_detail;
pub use list::parse_list;

/// Compile a selector literal. Only called with patterns known to be valid.
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// All text nodes under `el`, concatenated and trimmed.
fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Collapse every whitespace run to one space.
fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
