/*!
 * Error types for the subdialog application.
 *
 * This module contains custom error types for the different stages of the
 * extraction pipeline, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the subtitle metadata table
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The table could not be read from disk
    #[error("Failed to read metadata table {path}: {source}")]
    Read {
        /// Location of the table
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The table ended before its column header row
    #[error("Metadata table has no header row after {preamble} preamble line(s)")]
    MissingHeader {
        /// Number of preamble lines that were skipped
        preamble: usize,
    },

    /// A required column is absent from the header row
    #[error("Metadata table is missing required column: {0}")]
    MissingColumn(String),
}

/// Errors that can occur while processing a single subtitle file
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The subtitle file could not be opened or decompressed
    #[error("Failed to read subtitle file {path}: {source}")]
    Read {
        /// Subtitle file being read
        path: PathBuf,
        /// Underlying I/O or gzip failure
        #[source]
        source: std::io::Error,
    },

    /// The input file is not located under the input root
    #[error("File {file} is outside of input root {root}")]
    OutsideInputRoot {
        /// Offending file
        file: PathBuf,
        /// Configured input root
        root: PathBuf,
    },

    /// The dialogue record could not be serialized or parsed
    #[error("Failed to encode dialogue record: {0}")]
    Encode(#[from] serde_json::Error),

    /// The dialogue record could not be written
    #[error("Failed to write dialogue record {path}: {source}")]
    Write {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from loading the metadata table
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Error from processing a subtitle file
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

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
