use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{Result, StepError};
use crate::ledger::StepLedger;


/// Default file name of the step cache, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "stepmark.cache.json";

/// Loads the step ledger from disk.
///
/// A missing file yields an empty ledger (first run). A file that exists but
/// is not a valid `{"steps": {...}}` document is an error: discarding it
/// would silently throw away the record of every completed step.
///
/// # Errors
///
/// - [`StepError::CacheLoad`] if the file cannot be parsed, including when it
///   is empty
/// - [`StepError::Io`] if the file exists but cannot be read
pub fn load_ledger(cache_path: &Path) -> Result<StepLedger> {
    let content = match fs::read_to_string(cache_path) {
        Ok(content) => content,
        Err(source) if source.kind() == ErrorKind::NotFound => return Ok(StepLedger::new()),
        Err(source) => {
            return Err(StepError::Io {
                path: cache_path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| StepError::CacheLoad {
        path: cache_path.to_path_buf(),
        source,
    })
}

/// Writes the whole ledger to disk, replacing the previous contents.
///
/// The document is pretty-printed with four-space indentation and steps
/// sorted by name, so the file diffs cleanly between runs. It is written to a
/// temporary sibling first and renamed into place, so an interrupted write
/// never leaves a truncated cache behind.
///
/// Creates the parent directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created, or the file
/// cannot be written or renamed.
pub fn save_ledger(ledger: &StepLedger, cache_path: &Path) -> Result<()> {
    if let Some(parent) = cache_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|source| StepError::CreateCacheDir(parent.to_path_buf(), source))?;
    }

    let bytes = to_pretty_json(ledger)?;

    let temp_path = temp_path_for(cache_path);

    let mut temp_file = File::create(&temp_path).map_err(|source| StepError::Io {
        path: temp_path.clone(),
        source,
    })?;

    temp_file
        .write_all(&bytes)
        .map_err(|source| StepError::Io {
            path: temp_path.clone(),
            source,
        })?;

    temp_file.sync_all().map_err(|source| StepError::Io {
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, cache_path).map_err(|source| StepError::Io {
        path: cache_path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Removes the cache file from disk.
///
/// Idempotent: succeeds if the file doesn't exist.
pub fn clean_ledger(cache_path: &Path) -> Result<()> {
    match fs::remove_file(cache_path) {
        Ok(()) => Ok(()),
        Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StepError::Io {
            path: cache_path.to_path_buf(),
            source,
        }),
    }
}

/// The sibling a save writes before renaming it over `cache_path`.
///
/// `.tmp` is appended to the full file name, so the temporary file never
/// shares a name with an unrelated file next to the cache.
pub(crate) fn temp_path_for(cache_path: &Path) -> PathBuf {
    let mut name = cache_path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn to_pretty_json(ledger: &StepLedger) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    ledger
        .serialize(&mut serializer)
        .map_err(StepError::Serialization)?;
    bytes.push(b'\n');
    Ok(bytes)
}
