/*!
 * Tests for the synthesizer trait surface via the mock provider
 */

use slidecast::errors::SynthesisError;
use slidecast::providers::mock::MockSynthesizer;
use slidecast::providers::{SpeechRequest, SpeechSynthesizer};
use slidecast::timeline::index_boundaries;

use crate::common;

fn request(text: &str) -> SpeechRequest {
    SpeechRequest {
        text: text.to_string(),
        voice: "en-US-JennyNeural".to_string(),
        rate: "+0%".to_string(),
        volume: "+0%".to_string(),
    }
}

#[tokio::test]
async fn test_mockSynthesizer_working_shouldReplayScriptedOutput() {
    let boundaries = vec![
        common::boundary(0, 1200, "Hello world."),
        common::boundary(1200, 1400, "Second sentence."),
    ];
    let mock = MockSynthesizer::working(b"mp3", boundaries.clone());

    let output = mock.synthesize(request("Hello world. Second sentence.")).await.unwrap();

    assert_eq!(&output.audio[..], b"mp3");
    assert_eq!(output.boundaries, boundaries);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_mockSynthesizer_speaking_shouldEmitBackToBackBoundaries() {
    let mock = MockSynthesizer::speaking(&["One.", "Two.", "Three."], 10_000_000);

    let output = mock.synthesize(request("One. Two. Three.")).await.unwrap();
    let events = index_boundaries(&output.boundaries);

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].start_ms, 0.0);
    assert_eq!(events[1].start_ms, 1000.0);
    assert_eq!(events[2].start_ms, 2000.0);
    assert_eq!(events[2].end_ms, 3000.0);
}

#[tokio::test]
async fn test_mockSynthesizer_empty_shouldReturnNoOutput() {
    let mock = MockSynthesizer::empty();

    let output = mock.synthesize(request("anything")).await.unwrap();

    assert!(output.audio.is_empty());
    assert!(output.boundaries.is_empty());
}

#[tokio::test]
async fn test_mockSynthesizer_failing_shouldReturnRequestFailed() {
    let mock = MockSynthesizer::failing();

    let result = mock.synthesize(request("anything")).await;

    assert!(matches!(result, Err(SynthesisError::RequestFailed(_))));
    assert!(mock.test_connection().await.is_err());
    assert!(mock.list_voices().await.is_err());
}

#[tokio::test]
async fn test_mockSynthesizer_callCounter_shouldSurviveMove() {
    let mock = MockSynthesizer::speaking(&["Hi."], 5_000_000);
    let counter = mock.call_counter();

    let synthesizer: Box<dyn SpeechSynthesizer> = Box::new(mock);
    synthesizer.synthesize(request("Hi.")).await.unwrap();
    synthesizer.synthesize(request("Hi.")).await.unwrap();

    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_mockSynthesizer_listVoices_shouldReturnVoiceTable() {
    let mock = MockSynthesizer::empty();

    let voices = mock.list_voices().await.unwrap();

    assert_eq!(voices.len(), 1);
    assert_eq!(voices[0].short_name, "en-US-JennyNeural");
    assert_eq!(voices[0].locale, "en-US");
}
