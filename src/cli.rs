//! Command-line interface definitions for stepmark.
//!
//! This module defines the CLI structure using clap, including all subcommands
//! and their arguments. The main entry point is the [`Cli`] struct.
//!
//! # Example
//!
//! ```no_run
//! use stepmark::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_args();
//!
//! match cli.command() {
//!     Commands::Run { step, .. } => println!("Running step {step}"),
//!     _ => {}
//! }
//! ```

use std::path::{Component, Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::error::{Result, StepError};
use crate::store::DEFAULT_CACHE_FILE;

#[cfg(test)]
mod tests;

/// Main command-line interface for stepmark.
#[derive(Debug, Parser)]
#[command(
    name = "stepmark",
    bin_name = "stepmark",
    author,
    version,
    about = "Skip build steps whose inputs have not changed since they last completed",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    global_opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

/// Global options that apply to all stepmark commands.
#[derive(Debug, Parser)]
pub struct GlobalOpts {
    /// Path to the step cache file (defaults to ./stepmark.cache.json)
    #[arg(long, global = true, env = "STEPMARK_CACHE_PATH")]
    cache_path: Option<PathBuf>,

    /// Enable verbose output (use multiple times for more verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, env = "STEPMARK_VERBOSE")]
    verbose: u8,

    /// Silence all output except for errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        env = "STEPMARK_QUIET"
    )]
    quiet: bool,
}

impl GlobalOpts {
    /// Create a new builder for constructing `GlobalOpts` programmatically.
    pub fn builder() -> GlobalOptsBuilder {
        GlobalOptsBuilder::default()
    }

    /// Get the effective cache path, resolved against `working_dir` when
    /// relative.
    pub fn resolve_cache_path(&self, working_dir: &Path) -> PathBuf {
        let path = self.cache_path().unwrap_or(Path::new(DEFAULT_CACHE_FILE));
        normalize_path(working_dir.join(path))
    }

    /// Get the cache path option
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// Get the verbose level
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn quiet(&self) -> bool {
        self.quiet
    }
}

/// Builder for constructing `GlobalOpts` programmatically.
#[derive(Default)]
pub struct GlobalOptsBuilder {
    cache_path: Option<PathBuf>,
    verbose: u8,
    quiet: bool,
}

impl GlobalOptsBuilder {
    /// Set the cache file path.
    pub fn cache_path(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.cache_path = path.map(|p| p.into());
        self
    }

    /// Set the verbosity level (0 = normal, 1+ = verbose).
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable or disable quiet mode.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Build the `GlobalOpts` instance with the configured values.
    pub fn build(self) -> GlobalOpts {
        GlobalOpts {
            cache_path: self.cache_path,
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

impl Cli {
    /// Get the global options
    pub fn global_opts(&self) -> &GlobalOpts {
        &self.global_opts
    }

    /// Get the command
    pub fn command(&self) -> &Commands {
        &self.command
    }

    /// Create a builder for programmatic construction
    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }

    /// Parse command line arguments, tolerating a repeated program name as
    /// passed by wrappers that dispatch `<tool> stepmark ...`.
    pub fn parse_args() -> Self {
        let args: Vec<String> = std::env::args().collect();

        if args.len() >= 2 && args[1] == "stepmark" {
            let mut new_args = vec![args[0].clone()];
            new_args.extend_from_slice(&args[2..]);
            return Self::parse_from(new_args);
        }

        Self::parse()
    }
}

/// Builder for [`Cli`]
#[derive(Debug, Default)]
pub struct CliBuilder {
    cache_path: Option<PathBuf>,
    verbose: u8,
    quiet: bool,
    command: Option<Commands>,
}

impl CliBuilder {
    /// Set the cache path
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Set the verbose level
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable quiet mode
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    /// Set the command
    pub fn command(mut self, command: Commands) -> Self {
        self.command = Some(command);
        self
    }

    /// Build the Cli instance
    pub fn build(self) -> Result<Cli> {
        let command = self.command.ok_or(StepError::ConfigError {
            message: "Command is required".to_string(),
        })?;

        Ok(Cli {
            global_opts: GlobalOpts::builder()
                .cache_path(self.cache_path)
                .verbose(self.verbose)
                .quiet(self.quiet)
                .build(),
            command,
        })
    }
}

/// Normalize a path to be absolute and clean, without requiring it to exist.
///
/// Relative paths are joined onto the current directory, `.` components are
/// dropped and `..` pops the previous component. Symlinks are not resolved.
pub(crate) fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    let absolute = if path.is_relative() {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    } else {
        path.to_path_buf()
    };

    let mut components = Vec::new();
    for component in absolute.components() {
        match component {
            Component::ParentDir => {
                if let Some(last) = components.last()
                    && !matches!(last, Component::ParentDir | Component::RootDir)
                {
                    components.pop();
                    continue;
                }
                if matches!(components.last(), Some(Component::RootDir)) {
                    continue;
                }
                components.push(component);
            }
            Component::CurDir => continue,
            _ => components.push(component),
        }
    }

    components.into_iter().collect()
}

/// Available stepmark subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run a build command only if the step's inputs changed
    ///
    /// Checks the step against its recorded watermark. When any input is
    /// newer (or the step has never completed), runs COMMAND and, if it
    /// exits successfully, records the step as complete. A failing command
    /// leaves the record untouched so the step is retried next time.
    Run {
        /// Unique, stable name of the build step
        step: String,

        /// Input file or directory (repeatable; directories are scanned
        /// recursively)
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Resolve relative inputs against this directory, and run COMMAND
        /// in it
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Command and arguments to run when the step is stale
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Report whether a step is stale without running anything
    ///
    /// Prints `stale` or `fresh`.
    Status {
        /// Name of the build step
        step: String,

        /// Input file or directory (repeatable)
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Resolve relative inputs against this directory
        #[arg(long)]
        base_dir: Option<PathBuf>,
    },

    /// List every recorded step and its watermark
    List,

    /// Forget one step so it is rebuilt on the next run
    Forget {
        /// Name of the build step
        step: String,
    },

    /// Delete the step cache file, forcing every step to rebuild
    Clean,
}
