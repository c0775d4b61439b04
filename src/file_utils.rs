use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::ExtractionError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    // @note: Another worker may create the same directory concurrently
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        match fs::create_dir_all(path) {
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            result => result,
        }
    }

    /// Find files with a specific extension in a directory, in path order
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if entry.file_type().is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a subtitle file as Latin-1 text, transparently inflating `.gz` archives
    pub fn read_subtitle_text<P: AsRef<Path>>(path: P) -> Result<String, ExtractionError> {
        let path = path.as_ref();
        let read_error = |source| ExtractionError::Read {
            path: path.to_path_buf(),
            source,
        };

        let raw = fs::read(path).map_err(read_error)?;
        let is_gzip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

        let bytes = if is_gzip {
            let mut inflated = Vec::with_capacity(raw.len() * 3);
            GzDecoder::new(raw.as_slice())
                .read_to_end(&mut inflated)
                .map_err(read_error)?;
            inflated
        } else {
            raw
        };

        Ok(decode_latin1(&bytes))
    }

    /// Destination of the dialogue record for `file`: its path relative to
    /// `input_root`, re-rooted under `output_root`, with the new extension
    pub fn mirrored_output_path(
        input_root: &Path,
        output_root: &Path,
        file: &Path,
        extension: &str,
    ) -> Result<PathBuf, ExtractionError> {
        let relative = file
            .strip_prefix(input_root)
            .map_err(|_| ExtractionError::OutsideInputRoot {
                file: file.to_path_buf(),
                root: input_root.to_path_buf(),
            })?;

        // "1234.gz" -> "1234.jsonl"
        Ok(output_root.join(relative).with_extension(extension))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
    }
}

/// ISO-8859-1 maps every byte to the code point of the same value
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
