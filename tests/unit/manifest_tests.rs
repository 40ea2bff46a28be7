/*!
 * Tests for timestamp formatting and the text emitters (SRT, .scenes, playlist)
 */

use std::path::PathBuf;

use slidecast::manifest::{
    format_timestamp, parse_scenes_text, parse_timestamp, playlist_text, subtitle_text,
    timing_text,
};
use slidecast::timeline::{AlignedScene, Manifest, TimelineEntry};

use crate::common;

fn entry(scene: &str, timestamp_ms: f64, duration_ms: f64, asset: Option<&str>) -> TimelineEntry {
    TimelineEntry {
        scene: scene.to_string(),
        timestamp_ms,
        duration_ms,
        asset: asset.map(PathBuf::from),
    }
}

#[test]
fn test_formatTimestamp_withFullComponents_shouldRenderSrtStyle() {
    assert_eq!(format_timestamp(3_723_456.0), "01:02:03,456");
}

#[test]
fn test_formatTimestamp_withFraction_shouldTruncate() {
    assert_eq!(format_timestamp(999.9), "00:00:00,999");
    assert_eq!(format_timestamp(-5.0), "00:00:00,000");
}

#[test]
fn test_parseTimestamp_withValidInput_shouldRoundTrip() {
    let ms = parse_timestamp("01:02:03,456").unwrap();
    assert_eq!(ms, 3_723_456.0);
    assert_eq!(format_timestamp(ms), "01:02:03,456");
}

#[test]
fn test_parseTimestamp_withDotSeparator_shouldParse() {
    assert_eq!(parse_timestamp("00:00:01.500").unwrap(), 1500.0);
}

#[test]
fn test_parseTimestamp_withInvalidInput_shouldFail() {
    assert!(parse_timestamp("1:2:3,4").is_err());
    assert!(parse_timestamp("00:75:00,000").is_err());
    assert!(parse_timestamp("garbage").is_err());
}

#[test]
fn test_subtitleText_withTwoEvents_shouldEmitNumberedBlocks() {
    let events = vec![
        common::sentence(1, 0.0, 1200.0, "Hello world."),
        common::sentence(2, 1500.0, 2900.0, "Second sentence."),
    ];

    let srt = subtitle_text(&events);

    let expected = "1\n00:00:00,000 --> 00:00:01,200\nHello world.\n\n\
                    2\n00:00:01,500 --> 00:00:02,900\nSecond sentence.\n\n";
    assert_eq!(srt, expected);
}

#[test]
fn test_subtitleText_withNoEvents_shouldBeEmpty() {
    assert!(subtitle_text(&[]).is_empty());
}

#[test]
fn test_timingText_shouldStartWithTwoCommentLines() {
    let scenes = vec![
        AlignedScene {
            name: "overview".to_string(),
            timestamp_ms: 0.0,
        },
        AlignedScene {
            name: "detail".to_string(),
            timestamp_ms: 9500.0,
        },
    ];

    let text = timing_text(&scenes);
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with('#'));
    assert!(lines[1].starts_with('#'));
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "00:00:00,000  overview");
    assert_eq!(lines[4], "00:00:09,500  detail");
}

#[test]
fn test_parseScenesText_shouldRoundTripThroughTimingText() {
    let scenes = vec![
        AlignedScene {
            name: "intro".to_string(),
            timestamp_ms: 0.0,
        },
        AlignedScene {
            name: "chapter/setup".to_string(),
            timestamp_ms: 62_500.0,
        },
    ];

    let parsed = parse_scenes_text(&timing_text(&scenes));

    assert_eq!(parsed, scenes);
}

#[test]
fn test_parseScenesText_withMalformedLines_shouldSkipThem() {
    let content = "# header\n\nnot-a-timestamp scene\n00:00:05,000  kept\nlonelytoken\n";

    let parsed = parse_scenes_text(content);

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].name, "kept");
    assert_eq!(parsed[0].timestamp_ms, 5000.0);
}

#[test]
fn test_playlistText_withAllAssets_shouldEmitPairsAndTrailingHold() {
    let manifest = Manifest {
        entries: vec![
            entry("a", 0.0, 5000.0, Some("shots/01_a.png")),
            entry("b", 5000.0, 2500.0, Some("shots/02_b.png")),
        ],
        audio_duration_ms: 7500.0,
    };

    let playlist = playlist_text(&manifest).unwrap();

    let expected = "file 'shots/01_a.png'\nduration 5.000\n\
                    file 'shots/02_b.png'\nduration 2.500\n\
                    file 'shots/02_b.png'\n";
    assert_eq!(playlist, expected);
}

/// A slot with no asset re-emits the previous asset for its duration
#[test]
fn test_playlistText_withMissingMiddleAsset_shouldHoldPreviousFrame() {
    let manifest = Manifest {
        entries: vec![
            entry("a", 0.0, 3000.0, Some("01_a.png")),
            entry("gone", 3000.0, 2000.0, None),
            entry("c", 5000.0, 4000.0, Some("03_c.png")),
        ],
        audio_duration_ms: 9000.0,
    };

    let playlist = playlist_text(&manifest).unwrap();

    let file_lines: Vec<&str> = playlist
        .lines()
        .filter(|l| l.starts_with("file "))
        .collect();
    assert_eq!(
        file_lines,
        vec!["file '01_a.png'", "file '01_a.png'", "file '03_c.png'", "file '03_c.png'"]
    );
    assert!(playlist.contains("duration 2.000"));
}

#[test]
fn test_playlistText_withMissingFirstAsset_shouldFail() {
    let manifest = Manifest {
        entries: vec![entry("a", 0.0, 1000.0, None)],
        audio_duration_ms: 1000.0,
    };

    assert!(playlist_text(&manifest).is_err());
}

/// Emission is deterministic, two renders of the same manifest are identical
#[test]
fn test_playlistText_withSameManifest_shouldBeIdempotent() {
    let manifest = Manifest {
        entries: vec![
            entry("a", 0.0, 1234.5, Some("a.png")),
            entry("b", 1234.5, 765.5, Some("b.png")),
        ],
        audio_duration_ms: 2000.0,
    };

    assert_eq!(
        playlist_text(&manifest).unwrap(),
        playlist_text(&manifest).unwrap()
    );
}
