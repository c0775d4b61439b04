/*!
 * # subdialog - dialogue extraction from subtitle archives
 *
 * A Rust library that turns time-coded subtitle files into clean dialogue
 * segments for language-data collection.
 *
 * ## Features
 *
 * - Select subtitle archives by language through the corpus metadata table
 * - Group caption blocks into dialogue segments by the silence between them
 * - Clean markup, broken line wraps, dialogue dashes and ellipsis continuations
 * - Drop single-line segments and closing translator/credits notices
 * - Process a whole corpus in parallel, one JSON record per subtitle file
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `caption_parser`: Timestamp handling and dialogue segmentation
 * - `segment_cleaner`: Text cleaning and dialogue/notice filtering
 * - `dialogue_record`: Per-file output record
 * - `metadata`: Subtitle id to language lookup
 * - `app_config`: Configuration management
 * - `app_controller`: Batch processing over a worker pool
 * - `file_utils`: File system operations and archive decoding
 * - `language_utils`: ISO language code utilities
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
pub mod caption_parser;
pub mod dialogue_record;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod metadata;
pub mod segment_cleaner;

// Re-export main types for easier usage
pub use app_config::{Config, ExtractionOptions};
pub use app_controller::{BatchSummary, Controller, ExtractionContext, FileOutcome};
pub use caption_parser::{CaptionParser, Timestamp};
pub use dialogue_record::DialogueRecord;
pub use errors::{AppError, ExtractionError, MetadataError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use metadata::MetadataTable;
pub use segment_cleaner::{clean, filter_trailing_notice};
