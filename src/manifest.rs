use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Result, anyhow};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::timeline::{AlignedScene, Manifest, SentenceEvent};

// @module: Serialization of timelines into playlist, timing and subtitle text

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})[,.](\d{3})$").unwrap()
});

/// Format a millisecond timestamp as `HH:MM:SS,mmm` (SRT style).
///
/// Every component truncates toward zero.
pub fn format_timestamp(ms: f64) -> String {
    let total_ms = ms.max(0.0) as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parse an `HH:MM:SS,mmm` timestamp into milliseconds
pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
    let caps = TIMESTAMP_REGEX
        .captures(timestamp.trim())
        .ok_or_else(|| anyhow!("Invalid timestamp format: {}", timestamp))?;

    let part = |idx: usize| -> u64 { caps[idx].parse().unwrap_or(0) };
    let (hours, minutes, seconds, millis) = (part(1), part(2), part(3), part(4));

    if minutes >= 60 || seconds >= 60 {
        return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
    }

    Ok(((hours * 3600 + minutes * 60 + seconds) * 1000 + millis) as f64)
}

/// Render sentence events as SRT subtitle text
///
/// One block per event: sequence number, time range, text, blank separator.
/// Events are emitted in arrival order, never reordered.
pub fn subtitle_text(events: &[SentenceEvent]) -> String {
    let mut out = String::new();
    for event in events {
        let _ = writeln!(out, "{}", event.seq_num);
        let _ = writeln!(
            out,
            "{} --> {}",
            format_timestamp(event.start_ms),
            format_timestamp(event.end_ms)
        );
        let _ = writeln!(out, "{}", event.text);
        let _ = writeln!(out);
    }
    out
}

/// Render aligned scenes as `.scenes` timing text
///
/// Two leading comment lines, then one `TIMESTAMP  NAME` row per scene.
pub fn timing_text(scenes: &[AlignedScene]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# Scene timing — use these timestamps to sync screenshots with narration"
    );
    let _ = writeln!(out, "# Format: TIMESTAMP  SCENE_NAME");
    let _ = writeln!(out);
    for scene in scenes {
        let _ = writeln!(out, "{}  {}", format_timestamp(scene.timestamp_ms), scene.name);
    }
    out
}

/// Parse `.scenes` timing text back into aligned scenes
///
/// Blank lines and `#` comments are skipped; malformed rows are warned about
/// and dropped rather than failing the whole file.
pub fn parse_scenes_text(content: &str) -> Vec<AlignedScene> {
    let mut scenes = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((timestamp, name)) = line.split_once(char::is_whitespace) else {
            warn!("skipping malformed scene timing line: {}", line);
            continue;
        };
        match parse_timestamp(timestamp) {
            Ok(timestamp_ms) => scenes.push(AlignedScene {
                name: name.trim().to_string(),
                timestamp_ms,
            }),
            Err(e) => warn!("skipping scene timing line ({}): {}", e, line),
        }
    }
    scenes
}

/// Render a display timeline as an ffmpeg concat-demuxer playlist
///
/// One `file` + `duration` pair per timeline entry plus a trailing `file`
/// line repeating the final resolved asset — the concat demuxer needs that
/// hold entry or the last image renders for zero duration. A slot whose
/// asset is missing re-emits the previously resolved asset for the slot's
/// duration, so the playlist never contains a gap or a blank frame.
pub fn playlist_text(manifest: &Manifest) -> Result<String> {
    let mut out = String::new();
    let mut held: Option<&Path> = None;

    for entry in &manifest.entries {
        let asset = entry.asset.as_deref().or(held).ok_or_else(|| {
            anyhow!(
                "scene '{}' has no asset and no previous asset to hold",
                entry.scene
            )
        })?;
        held = Some(asset);

        let _ = writeln!(out, "file '{}'", asset.display());
        let _ = writeln!(out, "duration {:.3}", entry.duration_ms / 1000.0);
    }

    let last = held.ok_or_else(|| anyhow!("cannot emit a playlist for an empty timeline"))?;
    let _ = writeln!(out, "file '{}'", last.display());

    Ok(out)
}
