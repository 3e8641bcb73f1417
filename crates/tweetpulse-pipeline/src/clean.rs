//! Post text cleaning.

use std::sync::LazyLock;

use regex::Regex;

/// Matches, in one pass, the three token classes stripped from post text:
/// mentions, URLs, and any character outside the alphanumeric/whitespace set.
/// One pass matters: stripping punctuation first would destroy the `://` that
/// identifies a URL.
static STRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(@[A-Za-z0-9]+)|(\w+://\S+)|([^0-9A-Za-z \t])").expect("valid strip regex")
});

/// Strips mentions, URLs, and non-alphanumeric characters from `text`,
/// collapsing whitespace runs to single spaces and trimming the ends.
///
/// Total over any input; the empty string maps to itself. Idempotent, since
/// the output contains none of the stripped token classes.
#[must_use]
pub fn clean(text: &str) -> String {
    let stripped = STRIP_RE.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
