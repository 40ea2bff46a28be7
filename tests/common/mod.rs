/*!
 * Common test utilities for the slidecast test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use slidecast::providers::BoundaryEvent;
use slidecast::timeline::SentenceEvent;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample narration script with scene markers
pub fn create_test_script(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = "[SCENE: overview]\nHello world.\nSecond sentence.\n[SCENE: detail]\nThird sentence here.\n";
    create_test_file(dir, filename, content)
}

/// Creates empty screenshot PNG placeholders named `{index}_{name}.png`
pub fn create_screenshots(dir: &Path, names: &[&str]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let file_path = dir.join(format!("{:02}_{}.png", i + 1, name));
        fs::write(&file_path, b"png")?;
        paths.push(file_path);
    }
    Ok(paths)
}

/// Builds a boundary event in 100-ns ticks
pub fn boundary(offset_ms: u64, duration_ms: u64, text: &str) -> BoundaryEvent {
    BoundaryEvent {
        offset_ticks: offset_ms * 10_000,
        duration_ticks: duration_ms * 10_000,
        text: text.to_string(),
    }
}

/// Builds a sentence event directly in milliseconds
pub fn sentence(seq_num: usize, start_ms: f64, end_ms: f64, text: &str) -> SentenceEvent {
    SentenceEvent {
        seq_num,
        start_ms,
        end_ms,
        text: text.to_string(),
    }
}
