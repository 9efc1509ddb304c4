//! Markup to flat searchable text.
//!
//! Every extractor runs against [`NormalizedText`], never raw HTML, so one
//! label vocabulary works no matter how a page nests its cells.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static SCRIPT_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid regex"));
static STYLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#?\w+);").expect("valid regex"));

/// Markup-free, entity-decoded, whitespace-collapsed text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText(String);

impl NormalizedText {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips script/style blocks and tags, decodes entities and collapses
/// whitespace. Never fails; markup with no text yields an empty string.
///
/// Tags become a space so adjacent table cells stay separate tokens.
/// `&nbsp;` and `&amp;` are decoded, every other entity becomes a space,
/// so decoding can never introduce `<` or `>`.
#[must_use]
pub fn normalize_markup(raw: &str) -> NormalizedText {
    let text = SCRIPT_BLOCK_RE.replace_all(raw, " ");
    let text = STYLE_BLOCK_RE.replace_all(&text, " ");
    let mut text = TAG_RE.replace_all(&text, " ").into_owned();

    // `&amp;nbsp;` decodes to a fresh entity, so repeat until none remain.
    while ENTITY_RE.is_match(&text) {
        text = ENTITY_RE.replace_all(&text, decode_entity).into_owned();
    }

    NormalizedText(collapse_whitespace(&text))
}

fn decode_entity(caps: &Captures<'_>) -> &'static str {
    match &caps[1] {
        "amp" => "&",
        _ => " ",
    }
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
