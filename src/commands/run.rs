//! Run command implementation.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, StepError};
use crate::logging::Logger;
use crate::tracker::StepCache;

/// Executes the run command.
///
/// Runs `command` in `base_dir` only when `step` is stale, and records the
/// step as complete once the command exits successfully. Returns whether the
/// command was run.
///
/// # Errors
///
/// - [`StepError::CommandSpawn`] if the program cannot be started
/// - [`StepError::CommandFailed`] if it exits unsuccessfully; the step keeps
///   its previous watermark
/// - any error from checking or completing the step
pub fn run(
    cache_path: &Path,
    step: &str,
    inputs: &[PathBuf],
    base_dir: &Path,
    command: &[String],
    log: Logger,
) -> Result<bool> {
    let Some((program, args)) = command.split_first() else {
        return Err(StepError::ConfigError {
            message: format!("No command given for step '{step}'"),
        });
    };

    let mut cache = StepCache::open_with_logger(cache_path, log)?;

    cache.rebuild_if_needed(step, inputs, Some(base_dir), |stale| {
        if !stale {
            log.info(format!("Step '{step}' is up to date"));
            return Ok(false);
        }

        log.info(format!("Running step '{step}'"));
        log.verbose(1, format!("  {} (in {})", command.join(" "), base_dir.display()));

        let status = Command::new(program)
            .args(args)
            .current_dir(base_dir)
            .status()
            .map_err(|source| StepError::CommandSpawn {
                step: step.to_string(),
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(StepError::CommandFailed {
                step: step.to_string(),
                status: status.to_string(),
            });
        }

        Ok(true)
    })
}
