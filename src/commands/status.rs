//! Status command implementation.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::logging::Logger;
use crate::tracker::StepCache;

/// Executes the status command: reports whether `step` is stale.
///
/// Nothing is written to the cache.
pub fn status(
    cache_path: &Path,
    step: &str,
    inputs: &[PathBuf],
    base_dir: &Path,
    log: Logger,
) -> Result<bool> {
    let mut cache = StepCache::open_with_logger(cache_path, log)?;
    cache.needs_rebuild(step, inputs, Some(base_dir))
}
