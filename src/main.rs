//! # stepmark CLI
//!
//! Runs build steps only when their inputs changed since the step last
//! completed.
//!
//! ## Commands
//!
//! - **run**: run a command for a step if it is stale, then record it
//! - **status**: print `stale` or `fresh` for a step
//! - **list**: show every recorded step and its watermark
//! - **forget**: drop one step's record
//! - **clean**: delete the step cache
//!
//! ## Quick Start
//!
//! ```bash
//! stepmark run sdl_extract -i SDL-1.2.15.zip -- unzip -o SDL-1.2.15.zip
//! stepmark run sdl_make -i SDL-1.2.15/src --base-dir SDL-1.2.15 -- make
//! ```
//!
//! ## Environment Variables
//!
//! - `STEPMARK_CACHE_PATH`: Custom cache file location
//! - `STEPMARK_VERBOSE`: Enable verbose output
//! - `STEPMARK_QUIET`: Silence all output except errors

use std::io::IsTerminal;

use stepmark::cli::Cli;

fn main() -> miette::Result<()> {
    miette::set_panic_hook();

    // Plain output when stderr is not a terminal (CI logs, redirected builds)
    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    let cli = Cli::parse_args();

    stepmark::commands::execute(&cli).map_err(Into::into)
}
