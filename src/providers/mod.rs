/*!
 * Provider implementations for speech synthesis services.
 *
 * This module contains client implementations for text-to-speech backends:
 * - Edge: bridge service exposing Microsoft Edge neural voices
 * - Mock: scripted synthesizer for tests
 */

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::SynthesisError;

/// Parameters for one synthesis call
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Clean narration text (marker lines already stripped)
    pub text: String,

    /// Voice short name, e.g. `en-US-JennyNeural`
    pub voice: String,

    /// Speech rate adjustment, e.g. `+10%` or `-5%`
    pub rate: String,

    /// Volume adjustment in the same form
    pub volume: String,
}

/// One sentence-boundary event in the synthesizer's native time unit
///
/// Offsets and durations are 100-nanosecond ticks, as reported on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryEvent {
    /// Offset of the sentence start from the beginning of the audio, in ticks
    pub offset_ticks: u64,

    /// Spoken duration of the sentence, in ticks
    pub duration_ticks: u64,

    /// Sentence text as segmented by the synthesizer
    pub text: String,
}

/// Complete result of one synthesis call
///
/// The audio is buffered in full before this value exists; an interrupted
/// stream produces an error, never a partial output.
#[derive(Debug, Clone)]
pub struct SpeechOutput {
    /// Encoded audio (MP3) bytes
    pub audio: Bytes,

    /// Sentence-boundary events in arrival order
    pub boundaries: Vec<BoundaryEvent>,
}

/// A voice offered by the synthesis service
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceInfo {
    /// Voice short name used in requests
    #[serde(rename = "ShortName")]
    pub short_name: String,

    /// Voice gender
    #[serde(rename = "Gender", default)]
    pub gender: String,

    /// BCP-47 locale, e.g. `en-US`
    #[serde(rename = "Locale", default)]
    pub locale: String,

    /// Human-readable description
    #[serde(rename = "FriendlyName", default)]
    pub friendly_name: String,
}

/// Common trait for all speech synthesis providers
///
/// This trait defines the interface the synchronization core needs from a
/// text-to-speech backend: a complete audio buffer plus the ordered
/// sentence-boundary event list for one narration text.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Synthesize one narration text to audio and boundary events
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechOutput, SynthesisError>;

    /// List the voices the service offers
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SynthesisError>;

    /// Test the connection to the service
    async fn test_connection(&self) -> Result<(), SynthesisError>;
}

pub mod edge;
pub mod mock;
