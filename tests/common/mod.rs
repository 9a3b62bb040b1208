#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_fs::TempDir;
use assert_fs::prelude::*;
use filetime::{FileTime, set_file_mtime};
use stepmark::cli::{Cli, Commands};
use stepmark::commands::execute_with_dir;
use stepmark::error::Result;

/// Fixed mtimes used throughout the tests.
pub const T1: i64 = 1_600_000_000;
pub const T2: i64 = 1_600_000_500;
pub const T3: i64 = 1_600_001_000;

/// A scratch project directory with helpers to lay out inputs and drive the
/// CLI against it.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn dir(&self) -> &TempDir {
        &self.dir
    }

    /// Writes `rel` with `content` and sets its mtime to `secs`.
    pub fn file(&self, rel: &str, content: &str, secs: i64) -> PathBuf {
        let child = self.dir.child(rel);
        child.write_str(content).unwrap();
        set_mtime(child.path(), secs);
        child.path().to_path_buf()
    }

    /// Creates directory `rel` and sets its mtime to `secs`.
    pub fn directory(&self, rel: &str, secs: i64) -> PathBuf {
        let child = self.dir.child(rel);
        child.create_dir_all().unwrap();
        set_mtime(child.path(), secs);
        child.path().to_path_buf()
    }

    /// Sets the mtime of an existing path.
    pub fn touch(&self, rel: &str, secs: i64) {
        set_mtime(&self.dir.path().join(rel), secs);
    }

    pub fn default_cache_path(&self) -> PathBuf {
        self.dir.path().join("stepmark.cache.json")
    }

    /// Runs `command` with the project as the working directory.
    pub fn execute(&self, command: Commands) -> Result<()> {
        let cli = Cli::builder().quiet(true).command(command).build()?;
        execute_with_dir(&cli, Some(self.dir.path()))
    }

    /// Runs `command` against an explicit cache file.
    pub fn execute_with_cache(&self, cache_path: &Path, command: Commands) -> Result<()> {
        let cli = Cli::builder()
            .cache_path(cache_path)
            .quiet(true)
            .command(command)
            .build()?;
        execute_with_dir(&cli, Some(self.dir.path()))
    }

    /// Reads the default cache file as JSON.
    pub fn cache_json(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.default_cache_path()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    /// Number of lines in a log file the test commands append to.
    pub fn log_lines(&self, rel: &str) -> usize {
        std::fs::read_to_string(self.dir.path().join(rel))
            .map(|content| content.lines().count())
            .unwrap_or(0)
    }
}

pub fn set_mtime(path: &Path, secs: i64) {
    set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

/// Builds a `run` command that executes `script` through `sh -c`.
pub fn run_step(step: &str, inputs: &[&str], base_dir: Option<&str>, script: &str) -> Commands {
    Commands::Run {
        step: step.to_string(),
        inputs: inputs.iter().map(PathBuf::from).collect(),
        base_dir: base_dir.map(PathBuf::from),
        command: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
    }
}
