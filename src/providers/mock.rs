/*!
 * Mock synthesizer for testing.
 *
 * This module provides a scripted synthesizer that simulates different behaviors:
 * - `MockSynthesizer::working(...)` - Always succeeds with scripted output
 * - `MockSynthesizer::empty()` - Succeeds but produces no boundaries
 * - `MockSynthesizer::failing()` - Always fails with an error
 */

// Allow dead code - the mock is exercised by the test suite, not the binary
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::SynthesisError;
use crate::providers::{BoundaryEvent, SpeechOutput, SpeechRequest, SpeechSynthesizer, VoiceInfo};

/// Behavior mode for the mock synthesizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with the scripted audio and boundaries
    Working,
    /// Succeeds but returns no boundaries and empty audio
    Empty,
    /// Always fails with an error
    Failing,
}

/// Mock synthesizer that replays scripted output
#[derive(Debug)]
pub struct MockSynthesizer {
    /// Behavior mode
    behavior: MockBehavior,
    /// Scripted audio bytes
    audio: Bytes,
    /// Scripted boundary events
    boundaries: Vec<BoundaryEvent>,
    /// Number of synthesize calls observed
    call_count: Arc<AtomicUsize>,
}

impl MockSynthesizer {
    /// Create a working mock that replays the given boundaries
    pub fn working(audio: &[u8], boundaries: Vec<BoundaryEvent>) -> Self {
        Self {
            behavior: MockBehavior::Working,
            audio: Bytes::copy_from_slice(audio),
            boundaries,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock whose boundaries follow the given sentences,
    /// spoken back to back with the given per-sentence duration in ticks
    pub fn speaking(sentences: &[&str], sentence_ticks: u64) -> Self {
        let boundaries = sentences
            .iter()
            .enumerate()
            .map(|(i, text)| BoundaryEvent {
                offset_ticks: i as u64 * sentence_ticks,
                duration_ticks: sentence_ticks,
                text: (*text).to_string(),
            })
            .collect();
        Self::working(b"mock-mp3-bytes", boundaries)
    }

    /// Create a mock that succeeds with no output at all
    pub fn empty() -> Self {
        Self {
            behavior: MockBehavior::Empty,
            audio: Bytes::new(),
            boundaries: Vec::new(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always fails
    pub fn failing() -> Self {
        Self {
            behavior: MockBehavior::Failing,
            audio: Bytes::new(),
            boundaries: Vec::new(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of synthesize calls this mock has served
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Handle to the shared call counter, for asserting after a move
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, _request: SpeechRequest) -> Result<SpeechOutput, SynthesisError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(SpeechOutput {
                audio: self.audio.clone(),
                boundaries: self.boundaries.clone(),
            }),
            MockBehavior::Empty => Ok(SpeechOutput {
                audio: Bytes::new(),
                boundaries: Vec::new(),
            }),
            MockBehavior::Failing => Err(SynthesisError::RequestFailed(
                "mock synthesizer configured to fail".to_string(),
            )),
        }
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SynthesisError> {
        match self.behavior {
            MockBehavior::Failing => Err(SynthesisError::ConnectionError(
                "mock synthesizer configured to fail".to_string(),
            )),
            _ => Ok(vec![VoiceInfo {
                short_name: "en-US-JennyNeural".to_string(),
                gender: "Female".to_string(),
                locale: "en-US".to_string(),
                friendly_name: "Mock Jenny".to_string(),
            }]),
        }
    }

    async fn test_connection(&self) -> Result<(), SynthesisError> {
        match self.behavior {
            MockBehavior::Failing => Err(SynthesisError::ConnectionError(
                "mock synthesizer configured to fail".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
