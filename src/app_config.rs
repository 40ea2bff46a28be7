use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.

// @const: Rate/volume adjustment syntax, e.g. "+10%" or "-5%"
static ADJUSTMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]\d+%$").unwrap());

// @const: Resolution syntax, e.g. "1920x1080"
static RESOLUTION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)x(\d+)$").unwrap());

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Voice short name used for narration
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speech rate adjustment (e.g. "+10%", "-5%")
    #[serde(default = "default_adjustment")]
    pub rate: String,

    /// Volume adjustment in the same form
    #[serde(default = "default_adjustment")]
    pub volume: String,

    /// Speech synthesis service config
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Video render config
    #[serde(default)]
    pub render: RenderConfig,

    /// Episode table: narration slug, display title, screenshot directory slug
    #[serde(default = "default_episodes")]
    pub episodes: Vec<EpisodeConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech synthesis service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Bridge service base URL
    #[serde(default = "default_synthesis_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_synthesis_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_synthesis_endpoint(),
            timeout_secs: default_synthesis_timeout_secs(),
        }
    }
}

/// Video render configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Output resolution as "WIDTHxHEIGHT"
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Output frame rate (1 fps is a slideshow)
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Burn subtitles into the video when an SRT file is present
    #[serde(default)]
    pub burn_subtitles: bool,

    /// Encode timeout in seconds
    #[serde(default = "default_encode_timeout_secs")]
    pub encode_timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            fps: default_fps(),
            burn_subtitles: false,
            encode_timeout_secs: default_encode_timeout_secs(),
        }
    }
}

impl RenderConfig {
    /// Parse the configured resolution into (width, height)
    pub fn parse_resolution(&self) -> Result<(u32, u32)> {
        let caps = RESOLUTION_REGEX
            .captures(&self.resolution)
            .ok_or_else(|| anyhow!("Invalid resolution '{}', expected WxH", self.resolution))?;
        Ok((caps[1].parse()?, caps[2].parse()?))
    }
}

/// One episode in the tutorial series
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EpisodeConfig {
    // @field: Narration script/output slug, e.g. "ep1_getting_started"
    pub slug: String,

    // @field: Display title
    pub title: String,

    // @field: Screenshot directory slug, e.g. "01_getting_started"
    pub screenshot_dir: String,
}

impl EpisodeConfig {
    // @creates: Episode entry from its three slugs
    pub fn new(slug: &str, title: &str, screenshot_dir: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            screenshot_dir: screenshot_dir.to_string(),
        }
    }
}

/// Log level for filtering log messages
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Config {
    /// Validate the configuration after loading and applying CLI overrides
    pub fn validate(&self) -> Result<()> {
        if self.voice.is_empty() {
            return Err(anyhow!("Voice name must not be empty"));
        }
        if !ADJUSTMENT_REGEX.is_match(&self.rate) {
            return Err(anyhow!(
                "Invalid rate '{}', expected a signed percentage like +10%",
                self.rate
            ));
        }
        if !ADJUSTMENT_REGEX.is_match(&self.volume) {
            return Err(anyhow!(
                "Invalid volume '{}', expected a signed percentage like -5%",
                self.volume
            ));
        }
        if self.synthesis.endpoint.is_empty() {
            return Err(anyhow!("Synthesis endpoint must not be empty"));
        }

        self.render.parse_resolution()?;
        if self.render.fps == 0 {
            return Err(anyhow!("Frame rate must be at least 1"));
        }

        if self.episodes.is_empty() {
            return Err(anyhow!("Episode table must not be empty"));
        }
        for episode in &self.episodes {
            if episode.slug.is_empty() || episode.screenshot_dir.is_empty() {
                return Err(anyhow!(
                    "Episode '{}' must have a slug and a screenshot directory",
                    episode.title
                ));
            }
        }

        Ok(())
    }

    /// Select episodes by 1-based comma-separated indices, e.g. "1,3,9"
    ///
    /// `None` selects every episode.
    pub fn select_episodes(&self, selection: Option<&str>) -> Result<Vec<EpisodeConfig>> {
        let Some(selection) = selection else {
            return Ok(self.episodes.clone());
        };

        let mut selected = Vec::new();
        for part in selection.split(',') {
            let num: usize = part
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid episode number: '{}'", part.trim()))?;
            if num == 0 || num > self.episodes.len() {
                return Err(anyhow!(
                    "Episode {} out of range (1-{})",
                    num,
                    self.episodes.len()
                ));
            }
            selected.push(self.episodes[num - 1].clone());
        }
        Ok(selected)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            rate: default_adjustment(),
            volume: default_adjustment(),
            synthesis: SynthesisConfig::default(),
            render: RenderConfig::default(),
            episodes: default_episodes(),
            log_level: LogLevel::default(),
        }
    }
}

fn default_voice() -> String {
    "en-US-JennyNeural".to_string()
}

fn default_adjustment() -> String {
    "+0%".to_string()
}

fn default_synthesis_endpoint() -> String {
    "http://localhost:5500".to_string()
}

fn default_synthesis_timeout_secs() -> u64 {
    300
}

fn default_resolution() -> String {
    "1920x1080".to_string()
}

fn default_fps() -> u32 {
    1
}

fn default_encode_timeout_secs() -> u64 {
    600
}

fn default_episodes() -> Vec<EpisodeConfig> {
    vec![
        EpisodeConfig::new(
            "ep1_getting_started",
            "Episode 1 — Getting Started",
            "01_getting_started",
        ),
        EpisodeConfig::new(
            "ep2_sending_receiving",
            "Episode 2 — Sending & Receiving",
            "02_sending_receiving",
        ),
        EpisodeConfig::new(
            "ep3_encrypted_vault",
            "Episode 3 — Encrypted Vault",
            "03_encrypted_vault",
        ),
        EpisodeConfig::new("ep4_assets_qx", "Episode 4 — Assets & QX Trading", "04_assets_qx"),
        EpisodeConfig::new("ep5_defi", "Episode 5 — DeFi Suite", "05_defi"),
        EpisodeConfig::new(
            "ep6_governance",
            "Episode 6 — Governance & Auctions",
            "06_governance",
        ),
        EpisodeConfig::new("ep7_history", "Episode 7 — History & Monitoring", "07_history"),
        EpisodeConfig::new(
            "ep8_tools_settings",
            "Episode 8 — Tools & Settings",
            "08_tools_settings",
        ),
        EpisodeConfig::new("ep_msvault", "MSVault Deep Dive", "09_msvault"),
    ]
}
