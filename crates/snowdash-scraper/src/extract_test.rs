use std::sync::LazyLock;

use super::*;

static LIFTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Remont[ée]*s?\s+ouvertes?\s+(\d+)\s*/\s*(\d+)").expect("valid regex")
});
static BASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)En\s+bas\s+(\d[\d\s]*?)\s*cm").expect("valid regex"));
static TOP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)En\s+haut\s+(\d[\d\s]*?)\s*cm").expect("valid regex"));
static FRESH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Fraiche\s+(\w+)\s*\+\s*(\d+)\s*cm\s*/\s*24H").expect("valid regex")
});

// -----------------------------------------------------------------------
// first match / counted pairs
// -----------------------------------------------------------------------

#[test]
fn depths_from_en_bas_en_haut() {
    let text = "Hauteur de neige En bas 116cm Dure En haut 190cm Poudreuse";
    assert_eq!(
        first_capture(&BASE_RE, text).and_then(centimetres).as_deref(),
        Some("116cm")
    );
    assert_eq!(
        first_capture(&TOP_RE, text).and_then(centimetres).as_deref(),
        Some("190cm")
    );
}

#[test]
fn first_match_wins() {
    let text = "En bas 116cm ... demain En bas 120cm";
    assert_eq!(first_capture(&BASE_RE, text), Some("116"));
}

#[test]
fn absent_anchor_yields_none() {
    assert_eq!(first_capture(&BASE_RE, "Snow height 190 cm"), None);
    assert_eq!(counted_pair(&LIFTS_RE, "Remontées fermées"), None);
}

#[test]
fn counted_pair_extracts_both_sides() {
    let text = "Remontées ouvertes 20/22 ouvert";
    assert_eq!(counted_pair(&LIFTS_RE, text), Some((20, 22)));
    assert_eq!(pair_label(&LIFTS_RE, text).as_deref(), Some("20/22"));
}

#[test]
fn counted_pair_never_returns_numerator_alone() {
    assert_eq!(counted_pair(&LIFTS_RE, "Remontées ouvertes 20/ ouvert"), None);
}

// -----------------------------------------------------------------------
// max aggregation
// -----------------------------------------------------------------------

#[test]
fn fresh_snow_takes_maximum_across_stations() {
    let text = "Fraiche Signal + 39 cm/24H Fraiche Aiguille + 45 cm/24H Fraiche Etape +12cm/24h";
    assert_eq!(max_count(&FRESH_RE, text, 2), Some(45));
}

#[test]
fn max_count_without_matches_is_none() {
    assert_eq!(max_count(&FRESH_RE, "pas de neige fraiche", 2), None);
}

// -----------------------------------------------------------------------
// numeric normalization
// -----------------------------------------------------------------------

#[test]
fn parse_count_strips_separators() {
    assert_eq!(parse_count("1 230"), Some(1230));
    assert_eq!(parse_count("1,230"), Some(1230));
    assert_eq!(parse_count(" 45 "), Some(45));
    assert_eq!(parse_count("4a"), None);
    assert_eq!(parse_count(""), None);
}

#[test]
fn centimetres_appends_unit() {
    assert_eq!(centimetres("2 60").as_deref(), Some("260cm"));
}

// -----------------------------------------------------------------------
// snow quality
// -----------------------------------------------------------------------

#[test]
fn translate_quality_keyword_table() {
    assert_eq!(translate_quality(Some("Neige poudreuse")), SnowQuality::Powder);
    assert_eq!(translate_quality(Some("Fraîche")), SnowQuality::Fresh);
    assert_eq!(translate_quality(Some("Wet snow")), SnowQuality::Wet);
    assert_eq!(translate_quality(Some("Neige damée")), SnowQuality::Groomed);
    assert_eq!(translate_quality(Some("Packed powder")), SnowQuality::Powder);
    assert_eq!(translate_quality(Some("Dure")), SnowQuality::HardIcy);
    assert_eq!(translate_quality(Some("Glacée")), SnowQuality::HardIcy);
    assert_eq!(translate_quality(Some("Neige de printemps")), SnowQuality::Spring);
}

#[test]
fn translate_quality_passes_unmatched_through() {
    assert_eq!(
        translate_quality(Some("  Croûtée ")),
        SnowQuality::Other("Croûtée".to_string())
    );
}

#[test]
fn translate_quality_absent_is_unknown() {
    assert_eq!(translate_quality(None), SnowQuality::Unknown);
    assert_eq!(translate_quality(Some("   ")), SnowQuality::Unknown);
}

#[test]
fn scan_quality_is_case_insensitive() {
    assert_eq!(scan_quality("NEIGE HUMIDE"), Some(SnowQuality::Wet));
    assert_eq!(scan_quality("Ciel dégagé"), None);
}

#[test]
fn page_quality_needs_whole_words() {
    assert_eq!(
        scan_page_quality("Procédure de déclenchement, merci Richard. Refresh la page."),
        None
    );
    assert_eq!(scan_page_quality("Neige HUMIDE en bas"), Some(SnowQuality::Wet));
}

#[test]
fn page_quality_follows_priority_not_position() {
    assert_eq!(
        scan_page_quality("Pistes damées le matin, neige fraîche et poudreuse en altitude"),
        Some(SnowQuality::Powder)
    );
}

#[test]
fn page_quality_ignores_short_phrase_vocabulary() {
    assert_eq!(scan_page_quality("Neige dure et glacée"), None);
}

// -----------------------------------------------------------------------
// bounded
// -----------------------------------------------------------------------

#[test]
fn bounded_truncates_on_char_boundaries() {
    let reason = bounded("  vent fort sur les crêtes, télésièges arrêtés jusqu'à nouvel ordre ", 40);
    assert_eq!(reason.chars().count(), 40);
    assert!(reason.starts_with("vent fort sur les crêtes"));
}

#[test]
fn bounded_keeps_short_text() {
    assert_eq!(bounded(" bad weather ", CLOSURE_REASON_MAX_CHARS), "bad weather");
}
