//! Implementation of stepmark subcommands.
//!
//! `mod.rs` is a thin dispatcher; each command lives in its own module
//! (`run`, `status`, `ledger`).
//!
//! # Example
//!
//! ```no_run
//! use stepmark::cli::Cli;
//! use stepmark::commands;
//!
//! let cli = Cli::parse_args();
//! if let Err(e) = commands::execute(&cli) {
//!     eprintln!("Error: {e:?}");
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands, normalize_path};
use crate::error::{Result, StepError};
use crate::logging::Logger;

pub(crate) mod ledger;
pub(crate) mod run;
pub(crate) mod status;

pub use ledger::{clean, forget, list};
pub use run::run;
pub use status::status;


/// Execute commands based on the parsed CLI arguments.
pub fn execute(cli: &Cli) -> Result<()> {
    execute_with_dir(cli, None)
}

/// Execute commands with an explicit working directory.
///
/// The cache path and any `--base-dir` are resolved against `working_dir`
/// (the process's current directory when `None`).
pub fn execute_with_dir(cli: &Cli, working_dir: Option<&Path>) -> Result<()> {
    let opts = cli.global_opts();
    let log = Logger::new(opts.verbose(), opts.quiet());

    let current_dir = match working_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().map_err(|source| StepError::Io {
            path: PathBuf::from("."),
            source,
        })?,
    };

    let cache_path = opts.resolve_cache_path(&current_dir);
    log.verbose(2, format!("Using step cache {}", cache_path.display()));

    match cli.command() {
        Commands::Run {
            step,
            inputs,
            base_dir,
            command,
        } => {
            let base_dir = resolve_base_dir(&current_dir, base_dir.as_deref());
            run(&cache_path, step, inputs, &base_dir, command, log).map(|_| ())
        }
        Commands::Status {
            step,
            inputs,
            base_dir,
        } => {
            let base_dir = resolve_base_dir(&current_dir, base_dir.as_deref());
            let stale = status(&cache_path, step, inputs, &base_dir, log)?;
            println!("{}", if stale { "stale" } else { "fresh" });
            Ok(())
        }
        Commands::List => {
            for (step, watermark) in list(&cache_path, log)? {
                println!("{step}\t{watermark}");
            }
            Ok(())
        }
        Commands::Forget { step } => forget(&cache_path, step, log).map(|_| ()),
        Commands::Clean => clean(&cache_path, log),
    }
}

fn resolve_base_dir(working_dir: &Path, base_dir: Option<&Path>) -> PathBuf {
    match base_dir {
        Some(dir) => normalize_path(working_dir.join(dir)),
        None => normalize_path(working_dir),
    }
}
