use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use crate::app_config::{Config, EpisodeConfig};
use crate::encoder::{self, RenderJob};
use crate::file_utils::FileManager;
use crate::manifest;
use crate::providers::edge::EdgeSpeech;
use crate::providers::{SpeechRequest, SpeechSynthesizer};
use crate::script::ScriptDocument;
use crate::timeline;

// @module: Application controller for narration and slideshow generation

/// Parameters for one merge (render) run
#[derive(Debug, Clone)]
pub struct MergeJob {
    /// Narration MP3
    pub audio_path: PathBuf,

    /// `.scenes` timing file
    pub scenes_path: PathBuf,

    /// Directory of screenshot PNGs
    pub screenshots_dir: PathBuf,

    /// Output video path
    pub output_path: PathBuf,

    /// Burn subtitles from the sibling `.srt` file into the video; the
    /// config's `render.burn_subtitles` enables this as well
    pub burn_subtitles: bool,
}

/// Main application controller for episode generation and merging
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Speech synthesis backend
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let synthesizer = Arc::new(EdgeSpeech::new(
            &config.synthesis.endpoint,
            config.synthesis.timeout_secs,
        )?);

        Ok(Self {
            config,
            synthesizer,
        })
    }

    /// Create a controller with an explicit synthesizer backend - used by tests
    #[allow(dead_code)]
    pub fn with_synthesizer(config: Config, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            config,
            synthesizer,
        }
    }

    /// Generate narration audio, subtitles and scene timing for the selected
    /// episodes, one after another.
    ///
    /// Each episode's pipeline runs to completion before the next starts; an
    /// episode whose synthesis fails produces no output files at all.
    pub async fn generate(
        &self,
        episodes: &[EpisodeConfig],
        script_dir: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<()> {
        FileManager::ensure_dir(output_dir)?;

        info!(
            "Generating {} episode(s) with voice: {}",
            episodes.len(),
            self.config.voice
        );

        // Flag scripts that match no configured episode (typoed slugs)
        if let Ok(scripts) = FileManager::find_files(script_dir, "txt") {
            for script in scripts {
                let stem = script.file_stem().and_then(|s| s.to_str()).unwrap_or("");
                if !self.config.episodes.iter().any(|e| e.slug == stem) {
                    debug!("script {:?} matches no configured episode", script);
                }
            }
        }

        for episode in episodes {
            self.generate_episode(episode, script_dir, output_dir, force_overwrite)
                .await
                .with_context(|| format!("Episode '{}' failed", episode.slug))?;
        }

        Ok(())
    }

    /// Generate a single episode from its narration script
    async fn generate_episode(
        &self,
        episode: &EpisodeConfig,
        script_dir: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<()> {
        let script_path = script_dir.join(format!("{}.txt", episode.slug));
        if !FileManager::file_exists(&script_path) {
            info!("SKIP {} — {:?} not found", episode.slug, script_path);
            return Ok(());
        }

        let raw_text = FileManager::read_to_string(&script_path)?;
        if raw_text.trim().is_empty() {
            info!("SKIP {} — empty script", episode.slug);
            return Ok(());
        }

        let mp3_path = output_dir.join(format!("{}.mp3", episode.slug));
        let srt_path = output_dir.join(format!("{}.srt", episode.slug));
        let scenes_path = output_dir.join(format!("{}.scenes", episode.slug));

        if mp3_path.exists() && !force_overwrite {
            warn!(
                "Skipping '{}', output already exists (use -f to force overwrite)",
                episode.slug
            );
            return Ok(());
        }

        let document = ScriptDocument::parse(&raw_text);

        info!("GEN {}", episode.title);
        info!("    Voice: {}  Rate: {}", self.config.voice, self.config.rate);
        if document.has_markers() {
            info!("    Scenes: {} markers found", document.markers.len());
        }

        let start_time = std::time::Instant::now();
        let spinner = Self::spinner("Synthesizing narration");

        // The synthesizer buffers the whole stream; nothing is written to
        // disk until the stream has completed, so an aborted episode leaves
        // no partial files behind.
        let output = self
            .synthesizer
            .synthesize(SpeechRequest {
                text: document.clean_text.clone(),
                voice: self.config.voice.clone(),
                rate: self.config.rate.clone(),
                volume: self.config.volume.clone(),
            })
            .await
            .context("Speech synthesis failed")?;

        spinner.finish_and_clear();

        let events = timeline::index_boundaries(&output.boundaries);

        FileManager::write_bytes(&mp3_path, &output.audio)?;
        FileManager::write_to_file(&srt_path, &manifest::subtitle_text(&events))?;

        if document.has_markers() {
            let aligned = timeline::align_scenes(&document.clean_text, &document.markers, &events);
            FileManager::write_to_file(&scenes_path, &manifest::timing_text(&aligned))?;
            info!(
                "    -> {} ({} scene timings)",
                scenes_path.display(),
                aligned.len()
            );
        }

        let size_kb = output.audio.len() as f64 / 1024.0;
        info!("    -> {} ({:.0} KB)", mp3_path.display(), size_kb);
        info!(
            "    -> {} ({} subtitle lines)",
            srt_path.display(),
            events.len()
        );
        info!(
            "    Done in {}",
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Build a slideshow video from a timing file, screenshots and narration audio
    pub async fn merge(&self, job: MergeJob) -> Result<()> {
        encoder::ensure_ffmpeg().await?;

        if !FileManager::dir_exists(&job.screenshots_dir) {
            return Err(anyhow!(
                "Screenshots dir not found: {:?}",
                job.screenshots_dir
            ));
        }

        let content = FileManager::read_to_string(&job.scenes_path)?;
        let scenes = manifest::parse_scenes_text(&content);
        if scenes.is_empty() {
            return Err(anyhow!("No scenes found in {:?}", job.scenes_path));
        }

        let audio_duration_s = encoder::probe_duration(&job.audio_path).await?;
        info!("Audio duration: {:.1}s", audio_duration_s);
        info!("Scenes: {}", scenes.len());

        let screenshots_dir = job.screenshots_dir.clone();
        let timeline = timeline::build_timeline(&scenes, audio_duration_s * 1000.0, |name| {
            FileManager::find_screenshot(&screenshots_dir, name)
        })?;

        for entry in &timeline.entries {
            let target = match &entry.asset {
                Some(path) => path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
                None => "MISSING (will hold previous)".to_string(),
            };
            info!(
                "  {:6.1}s  {:5.1}s  {} -> {}",
                entry.timestamp_ms / 1000.0,
                entry.duration_ms / 1000.0,
                entry.scene,
                target
            );
        }

        let playlist = manifest::playlist_text(&timeline)?;

        let subtitle_path = if self.should_burn_subtitles(job.burn_subtitles) {
            let srt_path = job.scenes_path.with_extension("srt");
            if FileManager::file_exists(&srt_path) {
                Some(srt_path)
            } else {
                warn!("SRT not found at {:?}, skipping subtitles", srt_path);
                None
            }
        } else {
            None
        };

        let render_job = RenderJob {
            playlist,
            audio_path: job.audio_path.clone(),
            subtitle_path,
            output_path: job.output_path.clone(),
            resolution: self.config.render.parse_resolution()?,
            fps: self.config.render.fps,
            timeout_secs: self.config.render.encode_timeout_secs,
        };

        let start_time = std::time::Instant::now();
        let spinner = Self::spinner("Rendering slideshow");
        encoder::render(&render_job).await?;
        spinner.finish_and_clear();

        let size_mb = std::fs::metadata(&job.output_path)
            .map(|meta| meta.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0);
        info!(
            "Done! {} ({:.1} MB) in {}",
            job.output_path.display(),
            size_mb,
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// List English voices offered by the synthesis service
    pub async fn list_voices(&self) -> Result<()> {
        let voices = self
            .synthesizer
            .list_voices()
            .await
            .context("Failed to fetch voice catalog")?;

        let mut english: Vec<_> = voices
            .into_iter()
            .filter(|voice| voice.locale.starts_with("en-"))
            .collect();
        english.sort_by(|a, b| a.short_name.cmp(&b.short_name));

        println!("{:<35} {:<8} {:<8} {}", "Name", "Gender", "Locale", "Description");
        println!("{}", "-".repeat(90));
        for voice in english {
            println!(
                "{:<35} {:<8} {:<8} {}",
                voice.short_name, voice.gender, voice.locale, voice.friendly_name
            );
        }

        Ok(())
    }

    /// Subtitles are burned when either the per-run flag or the config asks
    /// for it
    fn should_burn_subtitles(&self, job_flag: bool) -> bool {
        job_flag || self.config.render.burn_subtitles
    }

    /// Spinner for long-running external calls
    fn spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Format an elapsed duration as "XmYs"
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m{}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{}.{}s", total_secs, duration.subsec_millis() / 100)
        }
    }
}
