/*!
 * Tests for file and folder utilities
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use subdialog::errors::ExtractionError;
use subdialog::file_utils::{FileManager, decode_latin1};
use crate::common;

/// Test directory creation is idempotent
#[test]
fn test_ensure_dir_withExistingDirectory_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("2010").join("05");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Test that concurrent workers can create the same output folder
#[test]
fn test_ensure_dir_withConcurrentCallers_shouldAllSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = Arc::new(temp_dir.path().join("shared").join("deep").join("folder"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let target = Arc::clone(&target);
            thread::spawn(move || FileManager::ensure_dir(target.as_path()))
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked")?;
    }

    assert!(FileManager::dir_exists(target.as_path()));
    Ok(())
}

/// Test that a file in the way of a directory is still an error
#[test]
fn test_ensure_dir_withFileInTheWay_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = common::create_test_file(temp_dir.path(), "occupied", "not a folder")?;

    assert!(FileManager::ensure_dir(&blocker).is_err());
    Ok(())
}

/// Test recursive discovery filtered by extension
#[test]
fn test_find_files_withNestedCorpus_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "2011/b/20.gz", "")?;
    common::create_test_file(root, "2010/10.gz", "")?;
    common::create_test_file(root, "2010/11.GZ", "")?;
    common::create_test_file(root, "2010/readme.txt", "")?;

    let found: Vec<PathBuf> = FileManager::find_files(root, ".gz")?
        .into_iter()
        .map(|path| path.strip_prefix(root).unwrap().to_path_buf())
        .collect();

    assert_eq!(
        found,
        vec![
            PathBuf::from("2010/10.gz"),
            PathBuf::from("2010/11.GZ"),
            PathBuf::from("2011/b/20.gz"),
        ]
    );
    Ok(())
}

/// Test reading a gzip archive holding Latin-1 text
#[test]
fn test_read_subtitle_text_withGzipLatin1_shouldDecodeAccents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_gzip_subtitle(temp_dir.path(), "1.gz", "¿Qué pasó, señor?\n")?;

    assert_eq!(FileManager::read_subtitle_text(&path)?, "¿Qué pasó, señor?\n");
    Ok(())
}

/// Test reading an uncompressed subtitle file
#[test]
fn test_read_subtitle_text_withPlainFile_shouldDecodeBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("2.srt");
    fs::write(&path, common::encode_latin1("Adiós\n"))?;

    assert_eq!(FileManager::read_subtitle_text(&path)?, "Adiós\n");
    Ok(())
}

/// Test that a damaged archive is reported as a read error
#[test]
fn test_read_subtitle_text_withCorruptArchive_shouldReturnReadError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "3.gz", "definitely not gzip")?;

    match FileManager::read_subtitle_text(&path) {
        Err(ExtractionError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected read error, got {:?}", other),
    }
    Ok(())
}

/// Test that output paths mirror the input tree
#[test]
fn test_mirrored_output_path_withNestedFile_shouldKeepRelativeLayout() -> Result<()> {
    let output = FileManager::mirrored_output_path(
        Path::new("/corpus/in"),
        Path::new("/corpus/out"),
        Path::new("/corpus/in/2010/05/1234.gz"),
        "jsonl",
    )?;

    assert_eq!(output, PathBuf::from("/corpus/out/2010/05/1234.jsonl"));
    Ok(())
}

/// Test that files outside the input root are rejected
#[test]
fn test_mirrored_output_path_withForeignFile_shouldFail() {
    let result = FileManager::mirrored_output_path(
        Path::new("/corpus/in"),
        Path::new("/corpus/out"),
        Path::new("/elsewhere/1234.gz"),
        "jsonl",
    );

    assert!(matches!(result, Err(ExtractionError::OutsideInputRoot { .. })));
}

/// Test writing creates missing parent folders
#[test]
fn test_write_to_file_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.jsonl");

    FileManager::write_to_file(&path, "{}")?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(fs::read_to_string(&path)?, "{}");
    Ok(())
}

#[test]
fn test_decode_latin1_withHighBytes_shouldMapToSameCodePoints() {
    assert_eq!(decode_latin1(&[0x41, 0xE9, 0xF1, 0xBF]), "Aéñ¿");
}
