use anyhow::{Context, Result};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language codes (ISO 639) whose subtitles are extracted
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Metadata table location, relative to the input folder
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Lines preceding the column header in the metadata table
    #[serde(default = "default_metadata_preamble_lines")]
    pub metadata_preamble_lines: usize,

    /// Segmentation and cleaning settings
    #[serde(default)]
    pub extraction: ExtractionOptions,

    /// Number of files processed in parallel, derived from the CPU count when unset
    #[serde(default)]
    pub workers: Option<usize>,

    /// Rewrite dialogue files that already exist
    #[serde(default = "default_true")]
    pub force_overwrite: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Dialogue segmentation and cleaning settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractionOptions {
    // @field: Longest silence (ms) between two captions of the same segment
    #[serde(default = "default_gap_threshold_ms")]
    pub gap_threshold_ms: u64,

    // @field: Fewest lines a cleaned segment needs to count as dialogue
    #[serde(default = "default_min_dialogue_lines")]
    pub min_dialogue_lines: usize,

    // @field: Keep the text after the last segment boundary
    #[serde(default)]
    pub flush_trailing: bool,

    // @field: Lowercase markers of a closing translator/credits notice
    #[serde(default = "default_notice_markers")]
    pub notice_markers: Vec<String>,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            gap_threshold_ms: default_gap_threshold_ms(),
            min_dialogue_lines: default_min_dialogue_lines(),
            flush_trailing: false,
            notice_markers: default_notice_markers(),
        }
    }
}

/// Log verbosity level
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

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_languages() -> Vec<String> {
    ["spa", "cat", "baq", "glg"].iter().map(|s| s.to_string()).collect()
}

fn default_metadata_file() -> String {
    "export.txt".to_string()
}

fn default_metadata_preamble_lines() -> usize {
    2
}

fn default_gap_threshold_ms() -> u64 {
    1000
}

fn default_min_dialogue_lines() -> usize {
    2 // a single line is on-screen text, not an exchange
}

fn default_notice_markers() -> Vec<String> {
    ["traduccion", "traducción", "subtitulos", "subtítulos"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

/// One worker per core, leaving a core for the coordinator
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            metadata_file: default_metadata_file(),
            metadata_preamble_lines: default_metadata_preamble_lines(),
            extraction: ExtractionOptions::default(),
            workers: None,
            force_overwrite: true,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load the configuration file, writing the defaults there first if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Worker pool size
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(default_workers)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(AppError::Config("At least one language must be selected".to_string()).into());
        }

        for code in &self.languages {
            language_utils::get_language_name(code)
                .with_context(|| format!("Unsupported language in selection: {}", code))?;
        }

        if self.metadata_file.trim().is_empty() {
            return Err(AppError::Config("Metadata file name is empty".to_string()).into());
        }

        if self.extraction.gap_threshold_ms == 0 {
            return Err(AppError::Config("Gap threshold must be greater than zero".to_string()).into());
        }

        if self.extraction.min_dialogue_lines == 0 {
            return Err(AppError::Config("A dialogue needs at least one line".to_string()).into());
        }

        if self.workers == Some(0) {
            return Err(AppError::Config("Worker count must be at least 1".to_string()).into());
        }

        Ok(())
    }
}
