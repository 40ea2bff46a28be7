/*!
 * Tests for scene marker extraction
 */

use slidecast::script::ScriptDocument;

/// Every marker line yields exactly one marker and no marker text survives
#[test]
fn test_parse_withMarkers_shouldExtractAllAndCleanText() {
    let raw = "[SCENE: overview]\nFirst line.\n[SCENE: detail]\nSecond line.\n";
    let doc = ScriptDocument::parse(raw);

    assert_eq!(doc.markers.len(), 2);
    assert_eq!(doc.markers[0].name, "overview");
    assert_eq!(doc.markers[1].name, "detail");
    assert!(!doc.clean_text.contains("[SCENE:"));
    assert_eq!(doc.clean_text, "First line.\nSecond line.");
}

/// Offsets are non-decreasing in source order and point at the following text
#[test]
fn test_parse_withMarkers_shouldRecordOffsetsInSourceOrder() {
    let raw = "[SCENE: a]\nFirst line.\n[SCENE: b]\nSecond line.\n[SCENE: c]\n";
    let doc = ScriptDocument::parse(raw);

    assert_eq!(doc.markers[0].offset, 0);
    // "First line.\n" is 12 bytes
    assert_eq!(doc.markers[1].offset, 12);
    assert!(doc.markers[1].offset <= doc.markers[2].offset);
    assert_eq!(&doc.clean_text[doc.markers[1].offset..], "Second line.");
}

/// A script without markers is valid and yields the text untouched
#[test]
fn test_parse_withoutMarkers_shouldReturnNoMarkers() {
    let raw = "Just a narration line.\nAnd another one.";
    let doc = ScriptDocument::parse(raw);

    assert!(doc.markers.is_empty());
    assert!(!doc.has_markers());
    assert_eq!(doc.clean_text, raw);
}

/// Empty input is valid and produces an empty document
#[test]
fn test_parse_withEmptyText_shouldReturnEmptyDocument() {
    let doc = ScriptDocument::parse("");
    assert!(doc.clean_text.is_empty());
    assert!(doc.markers.is_empty());
}

/// Duplicate marker names are preserved independently
#[test]
fn test_parse_withDuplicateNames_shouldKeepBoth() {
    let raw = "[SCENE: same]\nA.\n[SCENE: same]\nB.\n";
    let doc = ScriptDocument::parse(raw);

    assert_eq!(doc.markers.len(), 2);
    assert_eq!(doc.markers[0].name, "same");
    assert_eq!(doc.markers[1].name, "same");
    assert_ne!(doc.markers[0].offset, doc.markers[1].offset);
}

/// Marker lines tolerate surrounding whitespace and CRLF terminators
#[test]
fn test_parse_withWhitespaceAndCrlf_shouldStillMatchMarkers() {
    let raw = "  [SCENE: padded]  \r\nLine one.\r\n";
    let doc = ScriptDocument::parse(raw);

    assert_eq!(doc.markers.len(), 1);
    assert_eq!(doc.markers[0].name, "padded");
    assert_eq!(doc.markers[0].offset, 0);
}

/// Offsets stay valid slice positions after leading whitespace is stripped
#[test]
fn test_parse_withLeadingBlankLines_shouldRecomputeOffsets() {
    let raw = "\n\n[SCENE: first]\nHello there.\n";
    let doc = ScriptDocument::parse(raw);

    assert_eq!(doc.clean_text, "Hello there.");
    assert_eq!(doc.markers[0].offset, 0);
    assert_eq!(&doc.clean_text[doc.markers[0].offset..], "Hello there.");
}

/// A marker after all text clamps to the end of the clean text
#[test]
fn test_parse_withTrailingMarker_shouldClampOffset() {
    let raw = "Only line.\n[SCENE: outro]\n";
    let doc = ScriptDocument::parse(raw);

    assert_eq!(doc.clean_text, "Only line.");
    assert_eq!(doc.markers[0].offset, doc.clean_text.len());
}

/// A scene name may carry a chapter prefix with a slash
#[test]
fn test_parse_withSlashName_shouldKeepFullName() {
    let raw = "[SCENE: 12_msvault/tab_register]\nVault text.\n";
    let doc = ScriptDocument::parse(raw);

    assert_eq!(doc.markers[0].name, "12_msvault/tab_register");
}
