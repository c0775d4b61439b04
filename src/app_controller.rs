use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, ExtractionOptions};
use crate::dialogue_record::{DialogueRecord, RECORD_EXTENSION};
use crate::errors::ExtractionError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::metadata::MetadataTable;

// @module: Application controller for batch dialogue extraction

// @const: Archive extensions picked up from the input folder
const SUBTITLE_EXTENSIONS: [&str; 2] = ["gz", "srt"];

/// Read-only settings handed to every file task
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    // @field: Root of the subtitle corpus
    pub input_root: PathBuf,

    // @field: Root under which the corpus layout is mirrored
    pub output_root: PathBuf,

    // @field: Segmentation and cleaning settings
    pub options: ExtractionOptions,

    // @field: Rewrite records that already exist
    pub force_overwrite: bool,
}

/// Result of processing one subtitle file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Record written with this many segments
    Written { path: PathBuf, segments: usize },
    /// No dialogue survived cleaning, nothing written
    Empty,
    /// A record already exists and overwriting is disabled
    SkippedExisting(PathBuf),
}

/// Counters for a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub accepted: usize,
    pub written: usize,
    pub empty: usize,
    pub skipped_existing: usize,
    pub failed: usize,
    pub segments: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Written { segments, .. } => {
                self.written += 1;
                self.segments += segments;
            }
            FileOutcome::Empty => self.empty += 1,
            FileOutcome::SkippedExisting(_) => self.skipped_existing += 1,
        }
    }
}

/// Extract the dialogue of one subtitle file and write its record
pub fn process_file(context: &ExtractionContext, file: &Path) -> Result<FileOutcome, ExtractionError> {
    let output_path = FileManager::mirrored_output_path(
        &context.input_root,
        &context.output_root,
        file,
        RECORD_EXTENSION,
    )?;

    if !context.force_overwrite && FileManager::file_exists(&output_path) {
        debug!("Skipping {}, record already exists", file.display());
        return Ok(FileOutcome::SkippedExisting(output_path));
    }

    info!("Processing: {}", file.display());

    let raw_text = FileManager::read_subtitle_text(file)?;
    let record = DialogueRecord::extract(file.to_path_buf(), &raw_text, &context.options);

    if record.is_empty() {
        debug!("No dialogue found in {}", file.display());
        return Ok(FileOutcome::Empty);
    }

    info!("Writing {} segment(s): {}", record.len(), output_path.display());
    record.write_to_file(&output_path)?;

    Ok(FileOutcome::Written {
        path: output_path,
        segments: record.len(),
    })
}

/// Main application controller for dialogue extraction
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the metadata table that sits in (or is referenced from) the input folder
    pub fn load_metadata(&self, input_root: &Path) -> Result<MetadataTable> {
        let path = input_root.join(&self.config.metadata_file);
        info!("Reading metadata: {}", path.display());

        let table = MetadataTable::load(&path, self.config.metadata_preamble_lines)?;
        info!("Metadata lists {} subtitle file(s)", table.len());
        Ok(table)
    }

    /// Whether the metadata assigns the file to one of the selected languages
    pub fn accepts_file(&self, metadata: &MetadataTable, file: &Path) -> bool {
        match metadata.language_of_file(file) {
            Some(language) => language_utils::is_language_selected(language, &self.config.languages),
            None => false,
        }
    }

    /// Find the subtitle files under `input_root` selected by the metadata.
    ///
    /// Each selected file owns its output path. When `N.gz` and `N.srt` share
    /// a folder, the earlier extension in `SUBTITLE_EXTENSIONS` wins.
    pub fn select_files(&self, input_root: &Path, metadata: &MetadataTable) -> Result<Vec<PathBuf>> {
        let mut candidates = Vec::new();
        let mut output_stems = HashSet::new();
        for ext in SUBTITLE_EXTENSIONS {
            for file in FileManager::find_files(input_root, ext)? {
                if output_stems.insert(file.with_extension("")) {
                    candidates.push(file);
                } else {
                    warn!("Skipping {}, another subtitle file has the same name", file.display());
                }
            }
        }
        candidates.sort();

        let total = candidates.len();
        let selected: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|file| self.accepts_file(metadata, file))
            .collect();

        info!(
            "Selected {} of {} subtitle file(s) for languages: {}",
            selected.len(),
            total,
            self.config.languages.join(", ")
        );
        Ok(selected)
    }

    /// Run the whole batch: every selected file under `input_root` gets a
    /// record under `output_root`. A failing file is logged and counted, the
    /// rest of the batch carries on.
    pub async fn run(&self, input_root: PathBuf, output_root: PathBuf) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_root) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_root));
        }

        let metadata = self.load_metadata(&input_root)?;
        let files = self.select_files(&input_root, &metadata)?;

        let mut summary = BatchSummary {
            accepted: files.len(),
            ..BatchSummary::default()
        };

        if files.is_empty() {
            warn!("No subtitle files matched the language selection");
            return Ok(summary);
        }

        FileManager::ensure_dir(&output_root)
            .with_context(|| format!("Failed to create output directory: {}", output_root.display()))?;

        let workers = self.config.effective_workers();
        info!("Processing subtitle files (workers: {}) ...", workers);

        let progress_bar = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let context = Arc::new(ExtractionContext {
            input_root,
            output_root,
            options: self.config.extraction.clone(),
            force_overwrite: self.config.force_overwrite,
        });

        let results = stream::iter(files)
            .map(|file| {
                let context = Arc::clone(&context);
                let progress_bar = progress_bar.clone();

                async move {
                    let display_name = file.display().to_string();
                    let result = tokio::task::spawn_blocking(move || process_file(&context, &file)).await;
                    progress_bar.inc(1);
                    (display_name, result)
                }
            })
            .buffer_unordered(workers)
            .collect::<Vec<_>>()
            .await;

        progress_bar.finish_and_clear();

        for (file, result) in results {
            match result {
                Ok(Ok(outcome)) => summary.record(&outcome),
                Ok(Err(e)) => {
                    error!("Error processing file {}: {}", file, e);
                    summary.failed += 1;
                }
                Err(e) => {
                    error!("Worker crashed while processing {}: {}", file, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Finished in {}: {} written, {} without dialogue, {} skipped, {} failed ({} segments)",
            Self::format_duration(start_time.elapsed()),
            summary.written,
            summary.empty,
            summary.skipped_existing,
            summary.failed,
            summary.segments
        );

        Ok(summary)
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
