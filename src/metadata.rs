/*!
 * Subtitle metadata table.
 *
 * The corpus ships a tab-separated export describing every subtitle file.
 * After a short preamble comes a header row; the `IDSubtitleFile` and
 * `SubLanguageID` columns tie each archive (named after its numeric id) to
 * the language of its captions.
 */

use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::MetadataError;

/// Header of the numeric subtitle file id column
pub const ID_COLUMN: &str = "IDSubtitleFile";

/// Header of the language code column
pub const LANGUAGE_COLUMN: &str = "SubLanguageID";

/// Subtitle id to language code lookup
#[derive(Debug, Default, Clone)]
pub struct MetadataTable {
    languages: HashMap<u64, String>,
}

impl MetadataTable {
    /// Read and parse the table at `path`
    pub fn load<P: AsRef<Path>>(path: P, preamble_lines: usize) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&String::from_utf8_lossy(&bytes), preamble_lines)
    }

    /// Parse table content, skipping `preamble_lines` lines before the header row.
    ///
    /// Rows without a numeric id or a language code are ignored. When an id
    /// appears twice the first row wins.
    pub fn parse(content: &str, preamble_lines: usize) -> Result<Self, MetadataError> {
        let mut lines = content.lines().skip(preamble_lines);

        let header = lines
            .next()
            .ok_or(MetadataError::MissingHeader { preamble: preamble_lines })?;
        let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
        let column_index = |name: &str| {
            columns
                .iter()
                .position(|column| *column == name)
                .ok_or_else(|| MetadataError::MissingColumn(name.to_string()))
        };
        let id_index = column_index(ID_COLUMN)?;
        let language_index = column_index(LANGUAGE_COLUMN)?;

        let mut languages = HashMap::new();
        let mut skipped = 0usize;

        for line in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let id = fields.get(id_index).and_then(|f| f.trim().parse::<u64>().ok());
            let language = fields
                .get(language_index)
                .map(|f| f.trim())
                .filter(|f| !f.is_empty());

            match (id, language) {
                (Some(id), Some(language)) => {
                    languages.entry(id).or_insert_with(|| language.to_string());
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Ignored {} incomplete metadata row(s)", skipped);
        }

        Ok(MetadataTable { languages })
    }

    /// Language code recorded for a subtitle id
    pub fn language_of(&self, id: u64) -> Option<&str> {
        self.languages.get(&id).map(String::as_str)
    }

    /// Language code of a subtitle archive, looked up through its file name
    pub fn language_of_file(&self, path: &Path) -> Option<&str> {
        self.language_of(subtitle_id(path)?)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// Numeric id encoded in a subtitle archive name (`1234.gz` is id 1234)
pub fn subtitle_id(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.trim().parse().ok()
}
