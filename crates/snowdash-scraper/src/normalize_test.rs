use super::*;

// -----------------------------------------------------------------------
// script / style removal
// -----------------------------------------------------------------------

#[test]
fn drops_script_content() {
    let html = r#"<p>Snow height</p><script type="text/javascript">var depth = "999cm";</script><p>190 cm</p>"#;
    let text = normalize_markup(html);
    assert_eq!(text.as_str(), "Snow height 190 cm");
    assert!(!text.as_str().contains("999"));
}

#[test]
fn drops_style_content_case_insensitively() {
    let html = "<STYLE>.lift { color: red }</STYLE><div>Lift (3/7)</div>";
    let text = normalize_markup(html);
    assert_eq!(text.as_str(), "Lift (3/7)");
}

#[test]
fn drops_multiline_script_blocks() {
    let html = "<script>\nwindow.snow = {\n  top: 'Powder'\n};\n</script >Fresh";
    assert_eq!(normalize_markup(html).as_str(), "Fresh");
}

// -----------------------------------------------------------------------
// tags and entities
// -----------------------------------------------------------------------

#[test]
fn tags_become_separators() {
    let html = "<td>En bas</td><td>116cm</td>";
    assert_eq!(normalize_markup(html).as_str(), "En bas 116cm");
}

#[test]
fn output_has_no_angle_brackets_from_tags() {
    let html = r#"<div class="a"><span data-x="1">Brévent</span> - <b>2525m</b></div>"#;
    let text = normalize_markup(html);
    assert!(!text.as_str().contains('<'));
    assert!(!text.as_str().contains('>'));
    assert_eq!(text.as_str(), "Brévent - 2525m");
}

#[test]
fn decodes_fixed_entity_set() {
    let text = normalize_markup("Trains&nbsp;&amp;&nbsp;Visits (2/3)");
    assert_eq!(text.as_str(), "Trains & Visits (2/3)");
}

#[test]
fn other_entities_become_spaces() {
    let text = normalize_markup("a&lt;script&gt;b &#233; c&eacute;");
    assert_eq!(text.as_str(), "a script b c");
}

#[test]
fn double_encoded_entities_are_fully_decoded() {
    let text = normalize_markup("Fraiche&amp;nbsp;Signal");
    assert_eq!(text.as_str(), "Fraiche Signal");
}

#[test]
fn collapses_whitespace_and_trims() {
    let text = normalize_markup("\n\t  Snow \u{a0} quality  \r\n :   Fresh   ");
    assert_eq!(text.as_str(), "Snow quality : Fresh");
}

#[test]
fn empty_markup_yields_empty_text() {
    assert!(normalize_markup("<div><br/></div>").is_empty());
    assert!(normalize_markup("").is_empty());
}

// -----------------------------------------------------------------------
// idempotence
// -----------------------------------------------------------------------

#[test]
fn normalization_is_idempotent() {
    let inputs = [
        "<p>Brévent &amp; Flégère</p>",
        "x &amp;amp;nbsp; y",
        "temp < 0 and wind > 40",
        "unclosed <script> tail",
        "<style>a{}</style>&#160;Ouverte&nbsp;",
        "lone & ampersand; &bogus",
    ];
    for input in inputs {
        let once = normalize_markup(input);
        let twice = normalize_markup(once.as_str());
        assert_eq!(once, twice, "not idempotent for {input:?}");
    }
}
