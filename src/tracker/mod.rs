//! The step cache: decides whether a build step is stale and remembers when
//! each step last completed.
//!
//! A [`StepCache`] is opened once per run against a fixed cache file. For
//! each step the caller first asks [`StepCache::needs_rebuild`], performs the
//! build work if told to, and then calls [`StepCache::mark_complete`], which
//! re-measures the step's inputs and persists the new watermark immediately.
//! [`StepCache::rebuild_if_needed`] bundles those three moves so completion
//! is only ever recorded after the work succeeded.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use stepmark::error::StepError;
//! use stepmark::tracker::StepCache;
//!
//! let mut cache = StepCache::open("stepmark.cache.json")?;
//! cache.rebuild_if_needed(
//!     "sdl_configure",
//!     &["configure"],
//!     Some(Path::new("SDL-1.2.15")),
//!     |stale| {
//!         if stale {
//!             // run ./configure here
//!         }
//!         Ok::<_, StepError>(())
//!     },
//! )?;
//! # Ok::<(), StepError>(())
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, StepError};
use crate::ledger::StepLedger;
use crate::logging::Logger;
use crate::store::{load_ledger, save_ledger, temp_path_for};
use crate::timestamp::{Exclusions, Timestamp, latest_modification_time_excluding};


/// Tracks build steps against a persistent cache file.
///
/// Holds the loaded ledger plus the inputs each step was last checked with
/// during this run. The inputs are only remembered in memory; a step checked
/// in a previous process must be checked again before it can be completed.
#[derive(Debug)]
pub struct StepCache {
    cache_path: PathBuf,
    ledger: StepLedger,
    pending_inputs: HashMap<String, Vec<PathBuf>>,
    log: Logger,
}

impl StepCache {
    /// Opens the cache at `cache_path`, loading any previously recorded
    /// steps. A missing file starts an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::CacheLoad`] if the file exists but cannot be
    /// parsed.
    pub fn open(cache_path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_logger(cache_path, Logger::default())
    }

    /// Like [`StepCache::open`], reporting decisions through `log`.
    pub fn open_with_logger(cache_path: impl Into<PathBuf>, log: Logger) -> Result<Self> {
        let cache_path = cache_path.into();
        let ledger = load_ledger(&cache_path)?;
        if ledger.is_empty() {
            log.verbose(2, format!("No steps recorded in {}", cache_path.display()));
        } else {
            log.verbose(
                2,
                format!(
                    "Loaded {} step record(s) from {}",
                    ledger.len(),
                    cache_path.display()
                ),
            );
        }
        Ok(Self {
            cache_path,
            ledger,
            pending_inputs: HashMap::new(),
            log,
        })
    }

    /// Path of the backing cache file.
    pub fn path(&self) -> &Path {
        &self.cache_path
    }

    /// Decides whether `step` must be rebuilt.
    ///
    /// Relative `inputs` are resolved against `base_dir` when one is given.
    /// The resolved inputs are remembered for [`StepCache::mark_complete`],
    /// replacing whatever this step was last checked with.
    ///
    /// A step with no recorded watermark always needs a rebuild. Otherwise it
    /// needs one only if an input is strictly newer than the watermark. The
    /// inputs are timestamped in both cases, so a missing input is reported
    /// even for a step that has never been built.
    ///
    /// Nothing is written to disk.
    ///
    /// # Errors
    ///
    /// - [`StepError::InvalidStep`] if `inputs` is empty
    /// - [`StepError::MissingInput`] if an input does not exist
    pub fn needs_rebuild<P: AsRef<Path>>(
        &mut self,
        step: &str,
        inputs: &[P],
        base_dir: Option<&Path>,
    ) -> Result<bool> {
        if inputs.is_empty() {
            return Err(StepError::InvalidStep {
                step: step.to_string(),
            });
        }

        let resolved = resolve_inputs(inputs, base_dir);
        self.pending_inputs.insert(step.to_string(), resolved.clone());

        let current = self.measure(step, resolved.as_slice())?;
        let recorded = self.ledger.watermark(step);

        let rebuild = match (recorded, current) {
            (None, _) => true,
            (Some(recorded), Some(current)) => current > recorded,
            (Some(_), None) => false,
        };

        match (recorded, current) {
            (Some(recorded), Some(current)) => self.log.verbose(
                1,
                format!(
                    "REBUILD({step}): rebuild required: {rebuild}; last build {recorded}; inputs \
                     changed {current}"
                ),
            ),
            _ => self.log.verbose(
                1,
                format!("REBUILD({step}): not previously built; building"),
            ),
        }

        Ok(rebuild)
    }

    /// Records that `step` completed successfully.
    ///
    /// The inputs from the step's last [`StepCache::needs_rebuild`] call are
    /// timestamped again, since the build work may have touched them, and
    /// the result replaces the step's watermark. The whole cache is then
    /// written to disk.
    ///
    /// Calling this for a step that was fresh is allowed and simply
    /// re-stamps it.
    ///
    /// # Errors
    ///
    /// - [`StepError::Usage`] if `step` was not checked during this run
    /// - [`StepError::MissingInput`] if an input vanished during the build
    /// - any error from writing the cache file
    pub fn mark_complete(&mut self, step: &str) -> Result<Timestamp> {
        let inputs = self
            .pending_inputs
            .get(step)
            .ok_or_else(|| StepError::Usage {
                step: step.to_string(),
            })?;

        let watermark = self
            .measure(step, inputs.as_slice())?
            .ok_or_else(|| StepError::InvalidStep {
                step: step.to_string(),
            })?;

        self.ledger.record(step, watermark);
        save_ledger(&self.ledger, &self.cache_path)?;

        self.log
            .verbose(1, format!("DONE_REBUILD({step}): watermark {watermark}"));

        Ok(watermark)
    }

    /// Checks `step`, hands the verdict to `work`, and marks the step
    /// complete if it was stale and `work` succeeded.
    ///
    /// When `work` returns an error the watermark is left untouched, so the
    /// step is retried on the next run, and the error is returned as is.
    /// Fresh steps are never re-stamped.
    pub fn rebuild_if_needed<P, F, T, E>(
        &mut self,
        step: &str,
        inputs: &[P],
        base_dir: Option<&Path>,
        work: F,
    ) -> std::result::Result<T, E>
    where
        P: AsRef<Path>,
        F: FnOnce(bool) -> std::result::Result<T, E>,
        E: From<StepError>,
    {
        let rebuild = self.needs_rebuild(step, inputs, base_dir)?;
        let output = work(rebuild)?;
        if rebuild {
            self.mark_complete(step)?;
        }
        Ok(output)
    }

    /// Returns the recorded watermark for `step`.
    pub fn watermark(&self, step: &str) -> Option<Timestamp> {
        self.ledger.watermark(step)
    }

    /// Iterates over every recorded step in name order.
    pub fn steps(&self) -> impl Iterator<Item = (&str, Timestamp)> {
        self.ledger.iter()
    }

    /// Drops the record for `step` so it is rebuilt next time, and persists
    /// the cache if anything changed.
    pub fn forget(&mut self, step: &str) -> Result<Option<Timestamp>> {
        let removed = self.ledger.remove(step);
        if removed.is_some() {
            save_ledger(&self.ledger, &self.cache_path)?;
            self.log.verbose(1, format!("Forgot step '{step}'"));
        }
        Ok(removed)
    }

    /// Newest mtime among `inputs`, ignoring the cache file and its
    /// temporary sibling so saving the cache never makes a step stale.
    fn measure(&self, step: &str, inputs: &[PathBuf]) -> Result<Option<Timestamp>> {
        let excluded = Exclusions::new()
            .file(&self.cache_path)
            .file(&temp_path_for(&self.cache_path));
        latest_modification_time_excluding(inputs, &excluded).map_err(|err| err.for_step(step))
    }
}

fn resolve_inputs<P: AsRef<Path>>(inputs: &[P], base_dir: Option<&Path>) -> Vec<PathBuf> {
    inputs
        .iter()
        .map(|input| match base_dir {
            Some(base) => base.join(input),
            None => input.as_ref().to_path_buf(),
        })
        .collect()
}
