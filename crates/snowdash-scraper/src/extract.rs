//! Shared field-extraction vocabulary.
//!
//! Every helper is tolerant of absence: a pattern that does not match yields
//! `None`, never an error. Counted pairs are only ever returned whole.

use std::sync::LazyLock;

use regex::Regex;
use snowdash_core::SnowQuality;

/// Priority-ordered keyword table. First keyword contained in the phrase wins.
const QUALITY_KEYWORDS: &[(&str, SnowQuality)] = &[
    ("poudreuse", SnowQuality::Powder),
    ("powder", SnowQuality::Powder),
    ("fraîche", SnowQuality::Fresh),
    ("fresh", SnowQuality::Fresh),
    ("humide", SnowQuality::Wet),
    ("wet", SnowQuality::Wet),
    ("damée", SnowQuality::Groomed),
    ("packed", SnowQuality::Groomed),
    ("groomed", SnowQuality::Groomed),
    ("dure", SnowQuality::HardIcy),
    ("hard", SnowQuality::HardIcy),
    ("glacée", SnowQuality::HardIcy),
    ("icy", SnowQuality::HardIcy),
    ("printemps", SnowQuality::Spring),
    ("spring", SnowQuality::Spring),
];

/// Whole-word vocabulary for scanning a full page, in priority order.
static PAGE_QUALITY_WORDS: LazyLock<Vec<(Regex, SnowQuality)>> = LazyLock::new(|| {
    [
        (r"(?i)\b(?:poudreuse|powder)\b", SnowQuality::Powder),
        (r"(?i)\b(?:fraîche|fresh)\b", SnowQuality::Fresh),
        (r"(?i)\b(?:humide|wet)\b", SnowQuality::Wet),
        (r"(?i)\b(?:damée|groomed)\b", SnowQuality::Groomed),
    ]
    .into_iter()
    .map(|(pattern, quality)| (Regex::new(pattern).expect("valid regex"), quality))
    .collect()
});

pub const CLOSURE_REASON_MAX_CHARS: usize = 40;

/// First match of capture group 1, trimmed. Empty captures count as absent.
#[must_use]
pub fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Numerator and denominator from groups 1 and 2 of the first match.
#[must_use]
pub fn counted_pair(re: &Regex, text: &str) -> Option<(u32, u32)> {
    let caps = re.captures(text)?;
    let open = parse_count(caps.get(1)?.as_str())?;
    let total = parse_count(caps.get(2)?.as_str())?;
    Some((open, total))
}

/// A counted pair rendered as `"open/total"`.
#[must_use]
pub fn pair_label(re: &Regex, text: &str) -> Option<String> {
    counted_pair(re, text).map(|(open, total)| format!("{open}/{total}"))
}

/// Largest capture-group-`group` count across every match.
#[must_use]
pub fn max_count(re: &Regex, text: &str, group: usize) -> Option<u32> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(group).and_then(|m| parse_count(m.as_str())))
        .max()
}

/// Parses an integer after stripping embedded whitespace and thousands
/// separators (`"1 230"`, `"1,230"`, `"1.230"`).
#[must_use]
pub fn parse_count(raw: &str) -> Option<u32> {
    let digits: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '.' | '\''))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `"116"` or `"1 16"` to `"116cm"`.
#[must_use]
pub fn centimetres(raw: &str) -> Option<String> {
    parse_count(raw).map(|n| format!("{n}cm"))
}

/// Canonical quality for a keyword contained in `phrase`, if any.
#[must_use]
pub fn scan_quality(phrase: &str) -> Option<SnowQuality> {
    let lower = phrase.to_lowercase();
    QUALITY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, quality)| quality.clone())
}

/// Quality named anywhere in a whole page. Only whole words count, so
/// "procédure" or "refresh" name nothing.
#[must_use]
pub fn scan_page_quality(text: &str) -> Option<SnowQuality> {
    PAGE_QUALITY_WORDS
        .iter()
        .find(|(word, _)| word.is_match(text))
        .map(|(_, quality)| quality.clone())
}

/// Translates a free-text quality phrase. Unmatched text is carried
/// verbatim; absent or blank text is [`SnowQuality::Unknown`].
#[must_use]
pub fn translate_quality(phrase: Option<&str>) -> SnowQuality {
    let Some(phrase) = phrase.map(str::trim).filter(|p| !p.is_empty()) else {
        return SnowQuality::Unknown;
    };
    scan_quality(phrase).unwrap_or_else(|| SnowQuality::Other(phrase.to_string()))
}

/// Trims and truncates to at most `max_chars` characters.
#[must_use]
pub fn bounded(raw: &str, max_chars: usize) -> String {
    raw.trim().chars().take(max_chars).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
