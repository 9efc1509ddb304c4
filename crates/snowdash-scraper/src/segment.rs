//! Slices normalized text into per-area windows.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::collapse_whitespace;

/// Span of the last window, which has no following anchor to bound it.
pub const MAX_TRAILING_WINDOW: usize = 3000;

const MIN_NAME_CHARS: usize = 3;
const MAX_NAME_CHARS: usize = 60;
const STOP_WORDS: &[&str] = &["from", "to", "max", "min", "near", "at"];

/// "Name - 2525m" style headings. Names hold letters, spaces, dashes,
/// apostrophes and parentheses only; a preceding counted pair or full stop
/// ends the candidate.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\p{L}[\p{L}\s\-–—()'’]+?)\s*[-–—]\s*(\d{3,4})\s*m").expect("valid regex")
});

/// One heading's own text, matched whole.
static HEADING_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\p{L}[\p{L}\s\-–—()'’]*?)\s*[-–—]\s*(\d{3,4})\s*m$").expect("valid regex")
});

/// Fixed station names of the Les Contamines bulletin table.
static STATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(AIGUILLE|SIGNAL|RUELLE|ETAPE|VILLAGE|COL\s*du\s*JOLY|TSD\s+Olympique)\s+(\d{3,4})\s*m",
    )
    .expect("valid regex")
});

/// One area (or station) and the text that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'t> {
    pub name: String,
    /// `"2525m"`.
    pub altitude: Option<String>,
    /// Text after the anchor, up to the next anchor occurrence.
    pub window: &'t str,
}

impl Segment<'_> {
    #[must_use]
    pub fn altitude_meters(&self) -> Option<u32> {
        self.altitude
            .as_deref()
            .and_then(|a| a.trim_end_matches('m').parse().ok())
    }
}

struct Occurrence {
    name: String,
    altitude: String,
    start: usize,
    body_start: usize,
}

/// Segments by generic "free text – altitude" headings.
#[must_use]
pub fn segment_by_headings(text: &str) -> Vec<Segment<'_>> {
    let occurrences = HEADING_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().trim();
            if !is_plausible_name(name) {
                tracing::trace!(candidate = name, "rejected heading candidate");
                return None;
            }
            Some(Occurrence {
                name: name.to_string(),
                altitude: format!("{}m", &caps[2]),
                start: whole.start(),
                body_start: whole.end(),
            })
        })
        .collect();
    build_segments(text, occurrences)
}

/// Segments at headings already isolated from the markup (e.g. the
/// normalized text of each `<h3>`). Each heading is located in `text` after
/// the previous one, so text preceding a heading never fuses into its name.
///
/// Headings that do not read "Name - 2525m", or that do not occur in `text`,
/// are skipped.
#[must_use]
pub fn segment_by_known_headings<'t>(text: &'t str, headings: &[String]) -> Vec<Segment<'t>> {
    let mut cursor = 0;
    let mut occurrences = Vec::new();

    for heading in headings {
        let Some(caps) = HEADING_TEXT_RE.captures(heading) else {
            continue;
        };
        let name = caps[1].trim();
        if !is_plausible_name(name) {
            tracing::trace!(candidate = name, "rejected heading candidate");
            continue;
        }
        let Some(offset) = text.get(cursor..).and_then(|rest| rest.find(heading.as_str())) else {
            continue;
        };

        let start = cursor + offset;
        cursor = start + heading.len();
        occurrences.push(Occurrence {
            name: name.to_string(),
            altitude: format!("{}m", &caps[2]),
            start,
            body_start: cursor,
        });
    }

    build_segments(text, occurrences)
}

/// Segments by the fixed station names, each followed by its altitude.
#[must_use]
pub fn segment_by_stations(text: &str) -> Vec<Segment<'_>> {
    let occurrences = STATION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Occurrence {
                name: collapse_whitespace(&caps[1]).to_uppercase(),
                altitude: format!("{}m", &caps[2]),
                start: whole.start(),
                body_start: whole.end(),
            })
        })
        .collect();
    build_segments(text, occurrences)
}

/// Window bounds come from every occurrence, then repeated names keep only
/// their first window.
fn build_segments(text: &str, occurrences: Vec<Occurrence>) -> Vec<Segment<'_>> {
    let bounds: Vec<usize> = occurrences
        .iter()
        .skip(1)
        .map(|o| o.start)
        .chain(std::iter::once(usize::MAX))
        .collect();

    let mut seen = HashSet::new();
    let mut segments = Vec::new();

    for (occurrence, next_start) in occurrences.into_iter().zip(bounds) {
        let key = collapse_whitespace(&occurrence.name).to_lowercase();
        if !seen.insert(key) {
            continue;
        }

        let end = if next_start == usize::MAX {
            floor_char_boundary(text, occurrence.start.saturating_add(MAX_TRAILING_WINDOW))
        } else {
            next_start
        };
        let window = text
            .get(occurrence.body_start.min(end)..end)
            .unwrap_or_default()
            .trim();

        segments.push(Segment {
            name: occurrence.name,
            altitude: Some(occurrence.altitude),
            window,
        });
    }

    segments
}

fn is_plausible_name(name: &str) -> bool {
    let chars = name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&chars) {
        return false;
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }
    let lower = name.to_lowercase();
    !STOP_WORDS.iter().any(|word| {
        lower
            .strip_prefix(word)
            .is_some_and(|rest| rest.starts_with(char::is_whitespace))
    })
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
