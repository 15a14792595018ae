use std::sync::LazyLock;

use regex::Regex;

static STRIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap());
static SEP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

const MAX_LEN: usize = 50;
const MAX_WORDS: usize = 7;

/// Build `YYYY_MM_<name>.md` (or `<name>.md` without a year) from a title.
///
/// Only ASCII letters, digits, `_`, whitespace and `-` survive; separator runs
/// become a single `_`. Long names are cut at a word boundary, never mid-word.
pub fn sanitize_filename(name: &str, year: Option<&str>, month: Option<u32>) -> String {
    let stripped = STRIP_RE.replace_all(name, "");
    let mut base = SEP_RE.replace_all(&stripped, "_").to_lowercase();

    if base.len() > MAX_LEN {
        base = base.split('_').take(MAX_WORDS).collect::<Vec<_>>().join("_");
    }

    let year = year.map(|y| {
        y.chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase()
    });
    match year.filter(|y| !y.is_empty()) {
        Some(year) => format!("{}_{:02}_{}.md", year, month.unwrap_or(1), base),
        None => format!("{}.md", base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_clean(s: &str) -> bool {
        s.strip_suffix(".md")
            .map(|b| !b.is_empty() && b.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'))
            .unwrap_or(false)
    }

    #[test]
    fn basic_title() {
        assert_eq!(sanitize_filename("Test Paper", Some("2020"), None), "2020_01_test_paper.md");
        assert_eq!(sanitize_filename("Test Paper", Some("2020"), Some(3)), "2020_03_test_paper.md");
        assert_eq!(sanitize_filename("Test Paper", None, Some(3)), "test_paper.md");
    }

    #[test]
    fn punctuation_and_separators() {
        assert_eq!(
            sanitize_filename("Risk: a (new) -- approach?", Some("2021"), None),
            "2021_01_risk_a_new_approach.md"
        );
        assert_eq!(sanitize_filename("Perché l'economia", Some("2022"), None), "2022_01_perch_leconomia.md");
    }

    #[test]
    fn long_names_keep_seven_words() {
        let name = "An extremely long title about many different things in economics and finance";
        let out = sanitize_filename(name, Some("2018"), None);
        assert_eq!(out, "2018_01_an_extremely_long_title_about_many_different.md");
    }

    #[test]
    fn short_names_are_not_truncated() {
        let name = "one two three four five six seven eight";
        assert!(name.len() <= 50);
        assert_eq!(sanitize_filename(name, None, None), "one_two_three_four_five_six_seven_eight.md");
    }

    #[test]
    fn deterministic_and_clean() {
        let titles = [
            "Test Paper",
            "Über die Quantenmechanik: [ein] {Versuch}",
            "ESG & Sustainability — A Review",
            "   leading and trailing   ",
        ];
        for t in titles {
            let a = sanitize_filename(t, Some("2020"), Some(11));
            let b = sanitize_filename(t, Some("2020"), Some(11));
            assert_eq!(a, b);
            assert!(a.starts_with("2020_11_"));
            assert!(is_clean(&a), "{a}");
        }
    }
}
