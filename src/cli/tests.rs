use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Cli, Commands, normalize_path};

#[test]
fn test_cli_parsing_defaults() {
    let cli = Cli::parse_from(["stepmark", "list"]);
    assert!(matches!(cli.command(), Commands::List));
    assert!(cli.global_opts().cache_path().is_none());
    assert!(
        cli.global_opts()
            .resolve_cache_path(Path::new("/work"))
            .ends_with("work/stepmark.cache.json")
    );
    assert_eq!(cli.global_opts().verbose(), 0);
    assert!(!cli.global_opts().quiet());
}

#[test]
fn test_run_command_parsing() {
    let cli = Cli::parse_from([
        "stepmark",
        "run",
        "sdl_configure",
        "-i",
        "configure",
        "--input",
        "Makefile.in",
        "--base-dir",
        "SDL-1.2.15",
        "--",
        "./configure",
        "--disable-shared",
        "--prefix=/usr",
    ]);

    match cli.command() {
        Commands::Run {
            step,
            inputs,
            base_dir,
            command,
        } => {
            assert_eq!(step, "sdl_configure");
            assert_eq!(
                inputs,
                &vec![PathBuf::from("configure"), PathBuf::from("Makefile.in")]
            );
            assert_eq!(base_dir.as_deref(), Some(Path::new("SDL-1.2.15")));
            assert_eq!(
                command,
                &vec![
                    "./configure".to_string(),
                    "--disable-shared".to_string(),
                    "--prefix=/usr".to_string()
                ]
            );
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_run_requires_inputs_and_command() {
    assert!(Cli::try_parse_from(["stepmark", "run", "step", "--", "make"]).is_err());
    assert!(Cli::try_parse_from(["stepmark", "run", "step", "-i", "src"]).is_err());
}

#[test]
fn test_status_command_parsing() {
    let cli = Cli::parse_from(["stepmark", "status", "autogen", "-i", "configure.ac"]);
    match cli.command() {
        Commands::Status {
            step,
            inputs,
            base_dir,
        } => {
            assert_eq!(step, "autogen");
            assert_eq!(inputs, &vec![PathBuf::from("configure.ac")]);
            assert!(base_dir.is_none());
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_verbose_flag() {
    let cli = Cli::parse_from(["stepmark", "-vv", "list"]);
    assert_eq!(cli.global_opts().verbose(), 2);
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    assert!(Cli::try_parse_from(["stepmark", "-q", "-v", "list"]).is_err());
}

#[test]
fn test_custom_cache_path() {
    let cli = Cli::parse_from(["stepmark", "--cache-path", "build/steps.json", "clean"]);
    assert_eq!(
        cli.global_opts().cache_path(),
        Some(Path::new("build/steps.json"))
    );
    assert!(
        cli.global_opts()
            .resolve_cache_path(Path::new("/work"))
            .ends_with("work/build/steps.json")
    );
    assert!(matches!(cli.command(), Commands::Clean));
}

#[test]
fn test_absolute_cache_path_ignores_working_dir() {
    let cli = Cli::parse_from(["stepmark", "--cache-path", "/tmp/steps.json", "list"]);
    assert_eq!(
        cli.global_opts().resolve_cache_path(Path::new("/work")),
        PathBuf::from("/tmp/steps.json")
    );
}

#[test]
fn test_global_flag_positioning() {
    let cli = Cli::parse_from(["stepmark", "forget", "sdl_patch", "--verbose"]);
    assert_eq!(cli.global_opts().verbose(), 1);
    match cli.command() {
        Commands::Forget { step } => assert_eq!(step, "sdl_patch"),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_cli_builder() {
    let cli = Cli::builder()
        .cache_path("custom.json")
        .verbose(2)
        .quiet(false)
        .command(Commands::List)
        .build()
        .expect("Failed to build CLI");

    assert_eq!(
        cli.global_opts().cache_path(),
        Some(Path::new("custom.json"))
    );
    assert_eq!(cli.global_opts().verbose(), 2);
    assert!(!cli.global_opts().quiet());
    assert!(matches!(cli.command(), Commands::List));

    assert!(Cli::builder().build().is_err());
}

#[test]
fn test_normalize_path() {
    let normalized = normalize_path("./target/./debug");
    assert!(normalized.is_absolute());
    assert!(!normalized.to_string_lossy().contains("/./"));

    let normalized = normalize_path("target/../other/target");
    assert!(normalized.is_absolute());
    assert!(normalized.ends_with("other/target"));
    assert!(!normalized.to_string_lossy().contains(".."));

    let abs_path = if cfg!(windows) {
        PathBuf::from("C:\\Users\\test")
    } else {
        PathBuf::from("/home/test")
    };
    assert_eq!(normalize_path(&abs_path), abs_path);

    let normalized = normalize_path("./a/b/../c/./d/../e");
    assert!(normalized.is_absolute());
    assert!(normalized.ends_with("a/c/e"));
}
