/*!
 * # Slidecast
 *
 * A Rust library for turning narration scripts into timed slideshow videos.
 *
 * ## Features
 *
 * - Extract `[SCENE: name]` markers from narration scripts
 * - Synthesize narration with Microsoft Edge neural voices via a bridge service
 * - Align scene markers to sentence-boundary timestamps from the synthesizer
 * - Build a display timeline with a missing-asset hold policy
 * - Emit SRT subtitles, `.scenes` timing files and ffmpeg concat playlists
 * - Render the final slideshow video with ffmpeg
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `script`: Scene marker extraction from raw scripts
 * - `timeline`: The synchronization core: sentence indexing, scene
 *   alignment and display timeline construction
 * - `manifest`: Serialization of timelines into playlist, timing and
 *   subtitle text
 * - `providers`: Speech synthesis backends:
 *   - `providers::edge`: edge-tts bridge client
 *   - `providers::mock`: scripted synthesizer for tests
 * - `encoder`: ffmpeg/ffprobe invocation
 * - `file_utils`: File system operations and the screenshot resolver
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod encoder;
pub mod errors;
pub mod file_utils;
pub mod manifest;
pub mod providers;
pub mod script;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, MergeJob};
pub use errors::{AppError, SynthesisError, TimelineError};
pub use script::{SceneMarker, ScriptDocument};
pub use timeline::{AlignedScene, Manifest, SentenceEvent, TimelineEntry};
