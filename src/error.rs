//! Error types for stepmark.
//!
//! Every fallible operation in the crate returns [`StepError`], defined with
//! `thiserror` and annotated with `miette` diagnostics so the binary can
//! render codes and help text.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use stepmark::error::{Result, StepError};
//!
//! fn require_input(step: &str, path: &Path) -> Result<()> {
//!     if !path.exists() {
//!         return Err(StepError::MissingInput {
//!             step: Some(step.to_string()),
//!             path: path.to_path_buf(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error types that can occur in stepmark operations
#[derive(Error, Debug, Diagnostic)]
pub enum StepError {
    /// A declared input path does not exist when timestamping is attempted.
    ///
    /// Fatal to the step being checked. Other steps' records are untouched.
    /// `step` is `None` when the timestamp oracle is queried directly.
    #[error(
        "Missing input '{}'{}",
        .path.display(),
        step_suffix(.step)
    )]
    #[diagnostic(
        code(stepmark::input::missing),
        help("Every declared input must exist before the step is checked.")
    )]
    MissingInput {
        /// Step whose inputs were being timestamped, if known
        step: Option<String>,
        /// The path that could not be found
        path: PathBuf,
    },

    /// A step was checked with an empty input set.
    #[error("Step '{step}' has no inputs")]
    #[diagnostic(
        code(stepmark::step::invalid),
        help("At least one input file or directory is required per step.")
    )]
    InvalidStep {
        /// The step that was declared without inputs
        step: String,
    },

    /// Completion was signalled for a step that was never checked in this run.
    #[error("No rebuild check was done for step '{step}', so its inputs are unknown")]
    #[diagnostic(
        code(stepmark::step::usage),
        help("Call needs_rebuild for the step before marking it complete.")
    )]
    Usage {
        /// The step that was marked complete
        step: String,
    },

    /// The step cache file exists but is not a valid `{"steps": {...}}`
    /// document.
    #[error("Failed to load step cache '{}'", .path.display())]
    #[diagnostic(
        code(stepmark::cache::load_error),
        help(
            "Check the file for a syntax error, or run 'stepmark clean' to discard the \
             recorded build history."
        )
    )]
    CacheLoad {
        /// The cache file that failed to parse
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// File system I/O error.
    #[error("I/O error accessing '{}'", .path.display())]
    #[diagnostic(code(stepmark::io_error))]
    Io {
        /// The path that caused the I/O error
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the step cache to JSON.
    #[error("Failed to serialize step cache")]
    #[diagnostic(code(stepmark::cache::serialization_error))]
    Serialization(#[source] serde_json::Error),

    /// Failed to create the parent directory of the cache file.
    #[error("Failed to create cache directory '{}'", .0.display())]
    #[diagnostic(
        code(stepmark::cache::create_dir_error),
        help("Ensure you have write permissions for the parent directory.")
    )]
    CreateCacheDir(
        /// The directory path that couldn't be created
        PathBuf,
        /// The underlying I/O error
        #[source]
        std::io::Error,
    ),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(stepmark::config::error))]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// The build command for a step could not be started.
    #[error("Failed to start '{program}' for step '{step}'")]
    #[diagnostic(
        code(stepmark::run::spawn_error),
        help("Check that the command exists and is executable.")
    )]
    CommandSpawn {
        /// The step being rebuilt
        step: String,
        /// The program that failed to start
        program: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The build command for a step exited unsuccessfully.
    ///
    /// The step is not marked complete, so it is retried on the next run.
    #[error("Command for step '{step}' failed ({status})")]
    #[diagnostic(code(stepmark::run::command_failed))]
    CommandFailed {
        /// The step being rebuilt
        step: String,
        /// The exit status reported by the command
        status: String,
    },
}

impl StepError {
    /// Attach a step name to an oracle error that did not know it.
    pub(crate) fn for_step(self, step_name: &str) -> Self {
        match self {
            StepError::MissingInput { step: None, path } => StepError::MissingInput {
                step: Some(step_name.to_string()),
                path,
            },
            other => other,
        }
    }
}

fn step_suffix(step: &Option<String>) -> String {
    match step {
        Some(step) => format!(" for step '{step}'"),
        None => String::new(),
    }
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StepError>;
