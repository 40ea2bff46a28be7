// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};

use crate::app_config::{Config, LogLevel};
use crate::app_controller::{Controller, MergeJob};

mod app_config;
mod app_controller;
mod encoder;
mod errors;
mod file_utils;
mod manifest;
mod providers;
mod script;
mod timeline;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate narration MP3s, subtitles and scene timing files
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Merge narration audio with screenshots into a synced video
    Merge(MergeArgs),

    /// List available English voices from the synthesis service
    Voices(VoicesArgs),

    /// Generate shell completions for slidecast
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Episode number(s) to generate, comma-separated (default: all)
    #[arg(short, long)]
    episode: Option<String>,

    /// Directory containing {slug}.txt narration scripts
    #[arg(short, long, default_value = "narration")]
    script_dir: PathBuf,

    /// Output directory for MP3/SRT/scenes files
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// TTS voice name override
    #[arg(long)]
    voice: Option<String>,

    /// Speech rate adjustment override (e.g. "+10%", "-5%")
    #[arg(long)]
    rate: Option<String>,

    /// Volume adjustment override
    #[arg(long)]
    volume: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Episode number (auto-resolves audio/scenes/screenshot paths)
    #[arg(short, long)]
    episode: Option<usize>,

    /// Path to narration MP3
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Path to .scenes timing file
    #[arg(long)]
    scenes: Option<PathBuf>,

    /// Path to screenshots directory
    #[arg(long)]
    screenshots: Option<PathBuf>,

    /// Output video path (default: next to the audio)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Burn subtitles from the sibling .srt file into the video
    #[arg(short, long)]
    subtitles: bool,

    /// Narration output dir used with --episode
    #[arg(long, default_value = "output")]
    narration_dir: PathBuf,

    /// Screenshot base dir used with --episode
    #[arg(long, default_value = "../output")]
    screenshot_dir: PathBuf,

    /// Output resolution override (e.g. "1280x720")
    #[arg(short, long)]
    resolution: Option<String>,

    /// Output frame rate override
    #[arg(long)]
    fps: Option<u32>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct VoicesArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Slidecast - narration-synced slideshow videos
///
/// Turns [SCENE: name]-annotated narration scripts into synthesized speech,
/// subtitles and screenshot slideshows rendered with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "slidecast")]
#[command(version = "0.3.0")]
#[command(about = "Narration-synced slideshow video generator")]
#[command(long_about = "Slidecast synthesizes narration scripts with Microsoft Edge neural voices,
extracts [SCENE: name] markers, aligns them to sentence timestamps and renders
a screenshot slideshow synced to the narration.

EXAMPLES:
    slidecast generate                         # Generate all episodes
    slidecast generate -e 1,3                  # Generate episodes 1 and 3
    slidecast generate --voice en-GB-SoniaNeural -f
    slidecast merge -e 9                       # Render episode 9 to MP4
    slidecast merge -e 9 -s                    # ... with burned-in subtitles
    slidecast merge --audio out/ep.mp3 --scenes out/ep.scenes --screenshots shots/
    slidecast voices                           # List English voices
    slidecast completions bash > slidecast.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Load the configuration file, creating a default one when absent
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&level));
    }

    let mut config = if std::path::Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    match log_level {
        Some(cmd_log_level) => config.log_level = cmd_log_level.into(),
        // If log level was not set via command line, use the config's now
        None => log::set_max_level(to_level_filter(&config.log_level)),
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "slidecast", &mut std::io::stdout());
            Ok(())
        }
        Commands::Generate(args) => run_generate(args).await,
        Commands::Merge(args) => run_merge(args).await,
        Commands::Voices(args) => run_voices(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut config = load_config(&args.config_path, args.log_level)?;

    // Override config with CLI options if provided
    if let Some(voice) = &args.voice {
        config.voice = voice.clone();
    }
    if let Some(rate) = &args.rate {
        config.rate = rate.clone();
    }
    if let Some(volume) = &args.volume {
        config.volume = volume.clone();
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    let episodes = config.select_episodes(args.episode.as_deref())?;

    let controller = Controller::with_config(config)?;
    controller
        .generate(&episodes, &args.script_dir, &args.output, args.force_overwrite)
        .await
}

async fn run_merge(args: MergeArgs) -> Result<()> {
    let mut config = load_config(&args.config_path, args.log_level)?;

    if let Some(resolution) = &args.resolution {
        config.render.resolution = resolution.clone();
    }
    if let Some(fps) = args.fps {
        config.render.fps = fps;
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    // Resolve paths from the --episode shortcut
    let (audio, scenes, screenshots, output) = if let Some(num) = args.episode {
        let episode = config
            .select_episodes(Some(&num.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Unknown episode {}", num))?;

        let audio = args
            .audio
            .unwrap_or_else(|| args.narration_dir.join(format!("{}.mp3", episode.slug)));
        let scenes = args
            .scenes
            .unwrap_or_else(|| args.narration_dir.join(format!("{}.scenes", episode.slug)));
        let screenshots = args
            .screenshots
            .unwrap_or_else(|| args.screenshot_dir.join(&episode.screenshot_dir));
        let output = args
            .output
            .unwrap_or_else(|| args.narration_dir.join(format!("{}.mp4", episode.slug)));
        (audio, scenes, screenshots, output)
    } else {
        let (Some(audio), Some(scenes), Some(screenshots)) =
            (args.audio, args.scenes, args.screenshots)
        else {
            return Err(anyhow!(
                "Provide --episode or all of --audio, --scenes, --screenshots"
            ));
        };
        let output = args
            .output
            .unwrap_or_else(|| audio.with_extension("mp4"));
        (audio, scenes, screenshots, output)
    };

    if !audio.exists() {
        return Err(anyhow!("Audio not found: {:?}", audio));
    }
    if !scenes.exists() {
        return Err(anyhow!("Scenes file not found: {:?}", scenes));
    }

    let controller = Controller::with_config(config)?;
    controller
        .merge(MergeJob {
            audio_path: audio,
            scenes_path: scenes,
            screenshots_dir: screenshots,
            output_path: output,
            burn_subtitles: args.subtitles,
        })
        .await
}

async fn run_voices(args: VoicesArgs) -> Result<()> {
    let config = load_config(&args.config_path, args.log_level)?;
    let controller = Controller::with_config(config)?;
    controller.list_voices().await
}
