//! # stepmark
//!
//! A build-step staleness tracker for incremental build scripts.
//!
//! ## Overview
//!
//! Long build pipelines (extract an archive, patch it, run `configure`, run
//! `make`) are expensive to repeat when nothing changed. stepmark remembers,
//! per named step, the newest modification time its inputs had when the step
//! last completed successfully. On the next run a step is skipped unless one
//! of its inputs has become strictly newer than that watermark.
//!
//! ## Key Features
//!
//! - **mtime-based change detection**: no hashing, just the newest
//!   modification time across every input
//! - **Recursive directory inputs**: a change anywhere beneath a directory
//!   marks the step stale
//! - **Crash-safe persistence**: the cache is a small JSON document rewritten
//!   atomically after every completed step
//! - **Scoped protocol**: completion is only recorded after the step's work
//!   succeeded
//!
//! ## Architecture
//!
//! - [`tracker`]: the [`tracker::StepCache`] that decides and records
//! - [`timestamp`]: the modification-time oracle
//! - [`cli`]: command-line interface definitions using clap
//! - [`commands`]: implementation of the `stepmark` subcommands
//! - [`error`]: error types with thiserror + miette
//!
//! Internal modules (not part of the public API):
//! - `ledger`: the in-memory map of step watermarks
//! - `store`: JSON persistence of the ledger
//! - `logging`: verbosity-gated stderr output
//!
//! ## Usage in build scripts
//!
//! ```bash
//! stepmark run sdl_configure -i SDL-1.2.15/configure --base-dir SDL-1.2.15 \
//!     -- ./configure --disable-shared
//! stepmark run sdl_make -i SDL-1.2.15/src --base-dir SDL-1.2.15 -- make
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use stepmark::error::StepError;
//! use stepmark::tracker::StepCache;
//!
//! let mut cache = StepCache::open("stepmark.cache.json")?;
//! if cache.needs_rebuild("sdl_patch", &["patches"], None)? {
//!     // apply the patches here
//!     cache.mark_complete("sdl_patch")?;
//! }
//! # Ok::<(), StepError>(())
//! ```
//!
//! ## Error Handling
//!
//! The crate uses a combination of:
//! - `thiserror` for strongly-typed errors
//! - `miette` for rich diagnostic output in CLI
//!
//! All public functions return `Result` types with descriptive error variants.

pub mod cli;
pub mod commands;
pub mod error;
pub mod timestamp;
pub mod tracker;

// Internal modules
mod ledger;
mod logging;
mod store;

pub use logging::Logger;
