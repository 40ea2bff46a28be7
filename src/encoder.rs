use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{debug, error};
use serde_json::Value;
use tokio::process::Command;

// @module: ffmpeg/ffprobe invocation for audio probing and slideshow rendering

/// Parameters for one ffmpeg slideshow render
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// ffmpeg concat-demuxer playlist text
    pub playlist: String,

    /// Narration audio track
    pub audio_path: PathBuf,

    /// Subtitles to burn into the video, if any
    pub subtitle_path: Option<PathBuf>,

    /// Output video path
    pub output_path: PathBuf,

    /// Output resolution (width, height)
    pub resolution: (u32, u32),

    /// Output frame rate (1 fps is plenty for a slideshow)
    pub fps: u32,

    /// Encode timeout in seconds
    pub timeout_secs: u64,
}

/// Check that ffmpeg is available on PATH
pub async fn ensure_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .await
        .map_err(|_| anyhow!("ffmpeg not found on PATH. Install it: apt install ffmpeg"))?;

    if !output.status.success() {
        return Err(anyhow!("ffmpeg -version exited with {}", output.status));
    }
    Ok(())
}

/// Get audio duration in seconds using ffprobe
pub async fn probe_duration<P: AsRef<Path>>(audio_path: P) -> Result<f64> {
    let audio_path = audio_path.as_ref();

    if !audio_path.exists() {
        return Err(anyhow!("Audio file not found: {:?}", audio_path));
    }

    // Add timeout to prevent hanging on problematic files
    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_entries",
            "format=duration",
            audio_path.to_str().unwrap_or_default(),
        ])
        .output();

    let timeout_duration = Duration::from_secs(60);
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("ffprobe command timed out after 60 seconds"));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffprobe failed: {}", stderr);
        return Err(anyhow!("ffprobe command failed: {}", stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value =
        serde_json::from_str(&stdout).context("Failed to parse ffprobe JSON output")?;

    json.get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| anyhow!("ffprobe reported no duration for {:?}", audio_path))
}

/// Render a slideshow video from a playlist and an audio track
///
/// The playlist is written to a temporary concat file; ffmpeg scales and pads
/// every frame to the target resolution, optionally burns subtitles, and
/// encodes libx264 + aac with `-shortest` so the video ends with the audio.
pub async fn render(job: &RenderJob) -> Result<()> {
    // The tempfile handle must outlive the ffmpeg run
    let mut concat_file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .context("Failed to create concat list file")?;
    concat_file
        .write_all(job.playlist.as_bytes())
        .context("Failed to write concat list file")?;
    concat_file.flush()?;

    let concat_path = concat_file
        .path()
        .to_str()
        .ok_or_else(|| anyhow!("concat list path is not valid UTF-8"))?
        .to_string();

    let (width, height) = job.resolution;
    let mut video_filter = format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black",
        w = width,
        h = height
    );
    if let Some(srt_path) = &job.subtitle_path {
        // ffmpeg filter syntax needs colons in the path escaped
        let escaped = srt_path
            .to_string_lossy()
            .replace('\\', "/")
            .replace(':', "\\:");
        video_filter.push_str(&format!(
            ",subtitles='{}':force_style='FontSize=22,PrimaryColour=&HFFFFFF&,\
             OutlineColour=&H000000&,Outline=2,Shadow=1,MarginV=40'",
            escaped
        ));
    }
    video_filter.push_str(",format=yuv420p");

    let fps = job.fps.to_string();
    let audio = job
        .audio_path
        .to_str()
        .ok_or_else(|| anyhow!("audio path is not valid UTF-8"))?;
    let output_path = job
        .output_path
        .to_str()
        .ok_or_else(|| anyhow!("output path is not valid UTF-8"))?;

    let args = [
        "-y",
        "-f",
        "concat",
        "-safe",
        "0",
        "-i",
        &concat_path,
        "-i",
        audio,
        "-vf",
        &video_filter,
        "-r",
        &fps,
        "-c:v",
        "libx264",
        "-preset",
        "medium",
        "-crf",
        "23",
        "-c:a",
        "aac",
        "-b:a",
        "192k",
        "-shortest",
        "-movflags",
        "+faststart",
        output_path,
    ];
    debug!("running ffmpeg {}", args.join(" "));

    let ffmpeg_future = Command::new("ffmpeg").args(args).output();

    let timeout_duration = Duration::from_secs(job.timeout_secs);
    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| anyhow!("Failed to execute ffmpeg command: {}", e))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("ffmpeg render timed out after {} seconds", job.timeout_secs));
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("Slideshow render failed: {}", filtered);
        return Err(anyhow!(
            "ffmpeg render failed (exit {}): {}",
            result.status,
            filtered
        ));
    }

    Ok(())
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "      Metadata:",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "frame=",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
