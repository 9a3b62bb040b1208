//! Modification-time oracle.
//!
//! Answers one question: what is the newest modification time among a set of
//! paths? Directories are walked recursively, so a change anywhere beneath a
//! directory input moves its timestamp forward. Removing a file from a
//! directory is only noticed through the directory's own mtime; nothing here
//! tracks deletions explicitly.
//!
//! The step cache usually lives inside the tree it tracks. Saving it rewrites
//! the cache file and bumps the mtime of the directory holding it, so callers
//! pass it as an [`Exclusions`] entry: the file is skipped and its directory
//! contributes only the mtimes of its other entries.

use std::cmp::Ordering;
use std::fmt;
use std::fs::{self, Metadata};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Result, StepError};


/// Seconds since the UNIX epoch with fractional precision.
///
/// This is the unit stored in the step cache. Ordering is total (via
/// [`f64::total_cmp`]), so two timestamps read from the same file always
/// compare equal and a tie is never considered stale.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    pub fn from_secs_f64(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    /// Convert a [`SystemTime`]; times before the epoch become negative.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since) => Self(since.as_secs_f64()),
            Err(before) => Self(-before.duration().as_secs_f64()),
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Files that are never counted when walking a directory input.
///
/// Entries are matched by canonical location, so an excluded file is
/// recognised however the walk reaches it. The directory directly holding
/// an excluded file does not contribute its own mtime.
#[derive(Clone, Debug, Default)]
pub struct Exclusions {
    files: Vec<PathBuf>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes `path`. A path whose parent directory does not exist yet is
    /// ignored, since nothing under a walked input can match it.
    pub fn file(mut self, path: &Path) -> Self {
        if let Some(canonical) = canonical_location(path) {
            self.files.push(canonical);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        if !self.files.iter().any(|file| file.file_name() == Some(name)) {
            return false;
        }
        canonical_location(path).is_some_and(|canonical| self.files.contains(&canonical))
    }
}

fn canonical_location(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}

/// Returns the newest modification time among `paths`.
///
/// Files contribute their own mtime. Directories contribute their own mtime
/// and the mtime of every file and directory beneath them. Symbolic links are
/// followed.
///
/// Returns `Ok(None)` only when `paths` is empty.
///
/// # Errors
///
/// - [`StepError::MissingInput`] if any path (or an entry discovered while
///   walking a directory) does not exist
/// - [`StepError::Io`] for any other filesystem failure, including symlink
///   loops
pub fn latest_modification_time<P: AsRef<Path>>(paths: &[P]) -> Result<Option<Timestamp>> {
    latest_modification_time_excluding(paths, &Exclusions::default())
}

/// Like [`latest_modification_time`], skipping `excluded` files found while
/// walking directory inputs.
///
/// Paths listed directly in `paths` are always measured, even when excluded.
pub fn latest_modification_time_excluding<P: AsRef<Path>>(
    paths: &[P],
    excluded: &Exclusions,
) -> Result<Option<Timestamp>> {
    let mut latest = None;
    for path in paths {
        let mtime = path_modification_time(path.as_ref(), excluded)?;
        latest = latest.max(Some(mtime));
    }
    Ok(latest)
}

fn path_modification_time(path: &Path, excluded: &Exclusions) -> Result<Timestamp> {
    let metadata = fs::metadata(path).map_err(|source| stat_error(path, source))?;
    let own = modified(path, &metadata)?;

    if !metadata.is_dir() {
        return Ok(own);
    }

    // Contents come before their directory, so a directory holding an
    // excluded file is known by the time its own entry is reached.
    let mut latest = None;
    let mut holders: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .min_depth(1)
        .contents_first(true)
    {
        let entry = entry.map_err(|err| walk_error(path, err))?;

        if !excluded.is_empty() && excluded.matches(entry.path()) {
            holders.extend(entry.path().parent().map(Path::to_path_buf));
            continue;
        }
        if entry.file_type().is_dir() && holders.iter().any(|dir| dir == entry.path()) {
            continue;
        }

        let metadata = entry
            .metadata()
            .map_err(|err| walk_error(entry.path(), err))?;
        latest = latest.max(Some(modified(entry.path(), &metadata)?));
    }

    if !holders.iter().any(|dir| dir == path) {
        latest = latest.max(Some(own));
    }

    // A directory holding nothing but excluded files still has an mtime
    Ok(latest.unwrap_or(own))
}

fn modified(path: &Path, metadata: &Metadata) -> Result<Timestamp> {
    metadata
        .modified()
        .map(Timestamp::from_system_time)
        .map_err(|source| StepError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn stat_error(path: &Path, source: io::Error) -> StepError {
    if source.kind() == ErrorKind::NotFound {
        StepError::MissingInput {
            step: None,
            path: path.to_path_buf(),
        }
    } else {
        StepError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> StepError {
    let path = err.path().unwrap_or(root).to_path_buf();
    stat_error(&path, io::Error::from(err))
}
