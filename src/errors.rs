/*!
 * Error types for the slidecast application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a speech synthesis service
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Error when making a request to the service fails
    #[error("Synthesis request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a response or stream chunk fails
    #[error("Failed to parse synthesis response: {0}")]
    ParseError(String),

    /// Error returned by the service itself
    #[error("Synthesis service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The event stream ended before synthesis completed
    #[error("Synthesis stream interrupted: {0}")]
    StreamInterrupted(String),
}

/// Errors that can occur while building a display timeline
#[derive(Error, Debug)]
pub enum TimelineError {
    /// No scenes were available to build a timeline from
    #[error("no scenes to build a timeline from")]
    EmptyTimeline,

    /// No scene resolved to a screenshot asset at all
    #[error("no scene matched any screenshot asset")]
    NoAssetsResolved,

    /// The first scene has no screenshot and no previous asset to hold
    #[error("first scene '{0}' has no screenshot and no previous asset to hold")]
    FirstSceneMissing(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the speech synthesis service
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Error from timeline construction
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
