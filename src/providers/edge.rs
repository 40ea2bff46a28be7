use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use futures_util::StreamExt;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::SynthesisError;
use crate::providers::{BoundaryEvent, SpeechOutput, SpeechRequest, SpeechSynthesizer, VoiceInfo};

/// Client for an edge-tts bridge service exposing Microsoft Edge neural voices
///
/// The bridge streams newline-delimited JSON chunks: `audio` chunks carry
/// base64 MP3 data, `SentenceBoundary` chunks carry 100-ns tick offsets and
/// the sentence text, mirroring the upstream edge-tts chunk schema.
#[derive(Debug)]
pub struct EdgeSpeech {
    /// HTTP client for service requests
    client: Client,
    /// Service base URL
    endpoint: String,
}

/// Synthesis request body
#[derive(Debug, Serialize)]
struct SynthesizeBody<'a> {
    /// Text to speak
    text: &'a str,
    /// Voice short name
    voice: &'a str,
    /// Rate adjustment
    rate: &'a str,
    /// Volume adjustment
    volume: &'a str,
    /// Requested boundary granularity
    boundary: &'a str,
}

/// One chunk of the synthesis stream
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum StreamChunk {
    /// Base64-encoded audio data
    #[serde(rename = "audio")]
    Audio {
        /// Base64 MP3 payload
        data: String,
    },

    /// Sentence-boundary timing event
    #[serde(rename = "SentenceBoundary")]
    SentenceBoundary {
        /// Offset from audio start in 100-ns ticks
        offset: u64,
        /// Spoken duration in 100-ns ticks
        duration: u64,
        /// Sentence text
        text: String,
    },

    /// Any chunk type this client does not consume (word boundaries, metadata)
    #[serde(other)]
    Other,
}

impl EdgeSpeech {
    /// Create a new client for the given bridge endpoint
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SynthesisError::ConnectionError(e.to_string()))?;

        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(EdgeSpeech { client, endpoint })
    }

    /// Consume every complete NDJSON line in the pending buffer, leaving any
    /// trailing unterminated remainder in place for the next read
    fn consume_lines(
        pending: &mut String,
        audio: &mut Vec<u8>,
        boundaries: &mut Vec<BoundaryEvent>,
    ) -> Result<(), SynthesisError> {
        while let Some(pos) = pending.find('\n') {
            let line = pending[..pos].trim().to_string();
            pending.drain(..=pos);
            if line.is_empty() {
                continue;
            }
            let parsed: StreamChunk = serde_json::from_str(&line)
                .map_err(|e| SynthesisError::ParseError(e.to_string()))?;
            Self::apply_chunk(parsed, audio, boundaries)?;
        }
        Ok(())
    }

    /// Consume one parsed stream chunk into the audio buffer or boundary list
    fn apply_chunk(
        chunk: StreamChunk,
        audio: &mut Vec<u8>,
        boundaries: &mut Vec<BoundaryEvent>,
    ) -> Result<(), SynthesisError> {
        match chunk {
            StreamChunk::Audio { data } => {
                let decoded = BASE64
                    .decode(data.as_bytes())
                    .map_err(|e| SynthesisError::ParseError(format!("bad audio chunk: {}", e)))?;
                audio.extend_from_slice(&decoded);
            }
            StreamChunk::SentenceBoundary {
                offset,
                duration,
                text,
            } => {
                boundaries.push(BoundaryEvent {
                    offset_ticks: offset,
                    duration_ticks: duration,
                    text,
                });
            }
            StreamChunk::Other => {}
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechSynthesizer for EdgeSpeech {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechOutput, SynthesisError> {
        let body = SynthesizeBody {
            text: &request.text,
            voice: &request.voice,
            rate: &request.rate,
            volume: &request.volume,
            boundary: "sentence",
        };

        let response = self
            .client
            .post(format!("{}/synthesize", self.endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SynthesisError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let mut audio = Vec::new();
        let mut boundaries = Vec::new();
        let mut pending = String::new();

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| SynthesisError::StreamInterrupted(e.to_string()))?;
            pending.push_str(&String::from_utf8_lossy(&chunk));
            Self::consume_lines(&mut pending, &mut audio, &mut boundaries)?;
        }

        let rest = pending.trim();
        if !rest.is_empty() {
            let parsed: StreamChunk = serde_json::from_str(rest)
                .map_err(|e| SynthesisError::ParseError(e.to_string()))?;
            Self::apply_chunk(parsed, &mut audio, &mut boundaries)?;
        }

        if audio.is_empty() {
            return Err(SynthesisError::StreamInterrupted(
                "stream ended without any audio data".to_string(),
            ));
        }

        debug!(
            "synthesis complete: {} audio bytes, {} sentence boundaries",
            audio.len(),
            boundaries.len()
        );

        Ok(SpeechOutput {
            audio: Bytes::from(audio),
            boundaries,
        })
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SynthesisError> {
        let response = self
            .client
            .get(format!("{}/voices", self.endpoint))
            .send()
            .await
            .map_err(|e| SynthesisError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SynthesisError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<VoiceInfo>>()
            .await
            .map_err(|e| SynthesisError::ParseError(e.to_string()))
    }

    async fn test_connection(&self) -> Result<(), SynthesisError> {
        let response = self
            .client
            .get(format!("{}/voices", self.endpoint))
            .send()
            .await
            .map_err(|e| SynthesisError::ConnectionError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SynthesisError::ApiError {
                status_code: response.status().as_u16(),
                message: "voice catalog request failed".to_string(),
            });
        }

        Ok(())
    }
}
