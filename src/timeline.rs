use std::path::PathBuf;

use log::{debug, warn};

use crate::errors::TimelineError;
use crate::providers::BoundaryEvent;
use crate::script::SceneMarker;

// @module: Scene-timeline synchronization core

/// Minimum display duration for a scene slot, in milliseconds.
///
/// Guards against near-zero or negative durations when alignment produced
/// out-of-order timestamps.
pub const MIN_SCENE_DURATION_MS: f64 = 500.0;

/// Ticks per millisecond in the synthesizer's native time unit (100 ns).
const TICKS_PER_MS: f64 = 10_000.0;

/// One synthesized sentence with wall-clock timing in milliseconds
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceEvent {
    // @field: 1-based contiguous sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_ms: f64,

    // @field: End time in ms
    pub end_ms: f64,

    // @field: Sentence text as spoken
    pub text: String,
}

/// One scene mapped to a wall-clock timestamp in the narration audio
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedScene {
    /// Scene name from the marker
    pub name: String,

    /// Timestamp of the first sentence spoken at or after the marker, in ms
    pub timestamp_ms: f64,
}

/// One slot in the display timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    /// Scene name this slot belongs to
    pub scene: String,

    /// Start of the slot in the narration audio, in ms
    pub timestamp_ms: f64,

    /// How long the slot is displayed, in ms (never below [`MIN_SCENE_DURATION_MS`])
    pub duration_ms: f64,

    /// Resolved screenshot path; `None` marks a missing asset whose slot is
    /// filled by holding the previous asset at emission time
    pub asset: Option<PathBuf>,
}

/// Ordered display timeline plus the audio duration it was computed against
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Timeline entries in scene order
    pub entries: Vec<TimelineEntry>,

    /// Total narration audio duration in ms
    pub audio_duration_ms: f64,
}

/// Convert the synthesizer's raw boundary events into ordered sentence events
/// in milliseconds.
///
/// Boundary offsets and durations arrive in 100-nanosecond ticks. Sequence
/// numbers are assigned densely starting at 1 in arrival order; the stream is
/// assumed monotonic and is not re-sorted.
pub fn index_boundaries(events: &[BoundaryEvent]) -> Vec<SentenceEvent> {
    events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let start_ms = event.offset_ticks as f64 / TICKS_PER_MS;
            SentenceEvent {
                seq_num: i + 1,
                start_ms,
                end_ms: start_ms + event.duration_ticks as f64 / TICKS_PER_MS,
                text: event.text.clone(),
            }
        })
        .collect()
}

/// Map each scene marker to the timestamp of the first sentence spoken at or
/// after its position in the clean text.
///
/// The synthesizer reports timestamps against its own resegmented text, not
/// character offsets, so this is a best-effort containment match: the first
/// event whose trimmed text is a prefix of the clean-text suffix at the
/// marker wins. A marker that matches no event falls back to timestamp 0.0
/// and is logged as a data-quality warning, never an error.
pub fn align_scenes(
    clean_text: &str,
    markers: &[SceneMarker],
    events: &[SentenceEvent],
) -> Vec<AlignedScene> {
    markers
        .iter()
        .map(|marker| {
            let scene_suffix = clean_text[marker.offset..].trim_start();

            let matched = events.iter().find(|event| {
                let sentence = event.text.trim();
                !sentence.is_empty() && scene_suffix.starts_with(sentence)
            });

            let timestamp_ms = match matched {
                Some(event) => {
                    debug!(
                        "scene '{}' aligned to sentence {} at {:.0} ms",
                        marker.name, event.seq_num, event.start_ms
                    );
                    event.start_ms
                }
                None => {
                    warn!(
                        "scene '{}' matched no synthesized sentence, defaulting to 0 ms",
                        marker.name
                    );
                    0.0
                }
            };

            AlignedScene {
                name: marker.name.clone(),
                timestamp_ms,
            }
        })
        .collect()
}

/// Build the display timeline from aligned scenes, the total audio duration
/// and a screenshot resolver.
///
/// Each scene is displayed until the next scene starts, the last one until
/// the audio ends, with a 500 ms floor on every slot. Scenes whose asset
/// cannot be resolved stay in the manifest with their timing preserved; the
/// playlist emitter later fills such a slot by holding the previous asset.
/// Two situations are unrecoverable: no scene resolved to an asset at all,
/// and a missing asset on the very first scene (no previous frame to hold).
pub fn build_timeline<F>(
    scenes: &[AlignedScene],
    audio_duration_ms: f64,
    mut resolve: F,
) -> Result<Manifest, TimelineError>
where
    F: FnMut(&str) -> Option<PathBuf>,
{
    if scenes.is_empty() {
        return Err(TimelineError::EmptyTimeline);
    }

    let mut entries = Vec::with_capacity(scenes.len());
    for (i, scene) in scenes.iter().enumerate() {
        let until_ms = if i + 1 < scenes.len() {
            scenes[i + 1].timestamp_ms
        } else {
            audio_duration_ms
        };
        let duration_ms = (until_ms - scene.timestamp_ms).max(MIN_SCENE_DURATION_MS);

        let asset = resolve(&scene.name);
        if asset.is_none() {
            warn!(
                "no screenshot for scene '{}', its slot will hold the previous frame",
                scene.name
            );
        }

        entries.push(TimelineEntry {
            scene: scene.name.clone(),
            timestamp_ms: scene.timestamp_ms,
            duration_ms,
            asset,
        });
    }

    if entries.iter().all(|entry| entry.asset.is_none()) {
        return Err(TimelineError::NoAssetsResolved);
    }
    if entries[0].asset.is_none() {
        return Err(TimelineError::FirstSceneMissing(entries[0].scene.clone()));
    }

    Ok(Manifest {
        entries,
        audio_duration_ms,
    })
}
