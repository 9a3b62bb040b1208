//! Commands that inspect or edit the recorded steps directly.

use std::path::Path;

use crate::error::Result;
use crate::logging::Logger;
use crate::store::clean_ledger;
use crate::timestamp::Timestamp;
use crate::tracker::StepCache;

/// Executes the list command, returning every recorded step sorted by name.
pub fn list(cache_path: &Path, log: Logger) -> Result<Vec<(String, Timestamp)>> {
    let cache = StepCache::open_with_logger(cache_path, log)?;
    let steps: Vec<(String, Timestamp)> = cache
        .steps()
        .map(|(step, watermark)| (step.to_string(), watermark))
        .collect();

    if steps.is_empty() {
        log.verbose(1, format!("No steps recorded in {}", cache_path.display()));
    }

    Ok(steps)
}

/// Executes the forget command, returning the watermark that was dropped.
pub fn forget(cache_path: &Path, step: &str, log: Logger) -> Result<Option<Timestamp>> {
    let mut cache = StepCache::open_with_logger(cache_path, log)?;
    let removed = cache.forget(step)?;

    match removed {
        Some(_) => log.info(format!("Step '{step}' will be rebuilt on the next run")),
        None => log.warn(format!("No record for step '{step}'")),
    }

    Ok(removed)
}

/// Executes the clean command (remove the cache file).
pub fn clean(cache_path: &Path, log: Logger) -> Result<()> {
    log.verbose(1, format!("Removing step cache at {}", cache_path.display()));

    clean_ledger(cache_path)?;

    log.verbose(1, "Step cache removed");

    Ok(())
}
