use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_config::ExtractionOptions;
use crate::caption_parser::CaptionParser;
use crate::errors::ExtractionError;
use crate::file_utils::FileManager;
use crate::segment_cleaner;

// @module: Per-file dialogue output record

/// Extension of the files holding dialogue records
pub const RECORD_EXTENSION: &str = "jsonl";

// @struct: Cleaned dialogue segments of one subtitle file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueRecord {
    // @field: Subtitle file the segments were extracted from, or the record
    // file they were read back from; not part of the output
    #[serde(skip)]
    pub source_file: PathBuf,

    // @field: Cleaned segments in chronological order
    pub dialogues: Vec<String>,
}

impl DialogueRecord {
    pub fn new(source_file: PathBuf, dialogues: Vec<String>) -> Self {
        DialogueRecord { source_file, dialogues }
    }

    /// Segment raw subtitle text and drop a closing credits notice
    pub fn extract(source_file: PathBuf, raw_text: &str, options: &ExtractionOptions) -> Self {
        let segments = CaptionParser::from_options(options).parse(raw_text);
        let dialogues = segment_cleaner::filter_trailing_notice(segments, &options.notice_markers);

        Self::new(source_file, dialogues)
    }

    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }

    /// Serialize as a single-line JSON object: `{"dialogues": [...]}`
    pub fn to_json(&self) -> Result<String, ExtractionError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the record, creating missing parent directories
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ExtractionError> {
        let path = path.as_ref();
        FileManager::write_to_file(path, &self.to_json()?).map_err(|source| ExtractionError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExtractionError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ExtractionError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut record = Self::from_json(&json)?;
        record.source_file = path.to_path_buf();
        Ok(record)
    }
}
