use std::sync::LazyLock;

use regex::Regex;

static BULLET_GLYPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"•\s*").expect("valid bullet regex"));

/// A dash, star or short number followed by list text, at the start of the
/// passage or right after a sentence end.
static LIST_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[.!?:;]\s+)(?:[-–*]|\d{1,3}[.)])\s+(\w)").expect("valid list-marker regex")
});

static GLUED_PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\p{L})").expect("valid period regex"));

/// Collapses every whitespace run to one space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips list decoration from passage text before it is handed to the generator.
///
/// Dashes and numbers only count as markers where a list item can start, so
/// ranges like `10 - 15` and sentence-ending numbers survive.
///
/// Only meant for document passages: row chunks use ` - ` as a field separator.
pub fn tidy_passage(text: &str) -> String {
    let text = collapse_whitespace(text);
    let text = BULLET_GLYPH_RE.replace_all(&text, "");
    let text = LIST_MARKER_RE.replace_all(&text, "${1}${2}");
    let text = GLUED_PERIOD_RE.replace_all(&text, ". $1");
    text.trim().to_string()
}
