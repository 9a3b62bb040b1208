//! Tests that drive the `stepmark` binary and check what it reports.

mod common;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use common::{Project, T1, T2};
use predicates::prelude::*;

fn stepmark(project: &Project) -> Command {
    let mut cmd = cargo_bin_cmd!("stepmark");
    cmd.current_dir(project.path())
        .env_remove("STEPMARK_CACHE_PATH")
        .env_remove("STEPMARK_VERBOSE")
        .env_remove("STEPMARK_QUIET");
    cmd
}

fn project_with_input() -> Project {
    let project = Project::new();
    project.file("configure", "#!/bin/sh\n", T1);
    project
}

#[test]
fn test_status_reports_first_build_verdict() {
    let project = project_with_input();

    stepmark(&project)
        .args(["-v", "status", "sdl_configure", "-i", "configure"])
        .assert()
        .success()
        .stdout(predicate::eq("stale\n"))
        .stderr(predicate::str::contains(
            "REBUILD(sdl_configure): not previously built; building",
        ));
}

#[cfg(unix)]
#[test]
fn test_run_reports_verdicts_and_completion() {
    let project = project_with_input();

    stepmark(&project)
        .args(["-v", "run", "sdl_configure", "-i", "configure", "--", "true"])
        .assert()
        .success()
        .stderr(
            predicate::str::contains("REBUILD(sdl_configure): not previously built; building")
                .and(predicate::str::contains(
                    "DONE_REBUILD(sdl_configure): watermark 1600000000.000000",
                )),
        );

    stepmark(&project)
        .args(["-v", "status", "sdl_configure", "-i", "configure"])
        .assert()
        .success()
        .stdout(predicate::eq("fresh\n"))
        .stderr(predicate::str::contains(
            "REBUILD(sdl_configure): rebuild required: false; last build 1600000000.000000; \
             inputs changed 1600000000.000000",
        ));

    project.touch("configure", T2);

    stepmark(&project)
        .args(["-v", "status", "sdl_configure", "-i", "configure"])
        .assert()
        .success()
        .stdout(predicate::eq("stale\n"))
        .stderr(predicate::str::contains(
            "REBUILD(sdl_configure): rebuild required: true; last build 1600000000.000000; \
             inputs changed 1600000500.000000",
        ));
}

#[cfg(unix)]
#[test]
fn test_verdicts_are_hidden_without_verbose() {
    let project = project_with_input();

    stepmark(&project)
        .args(["run", "sdl_configure", "-i", "configure", "--", "true"])
        .assert()
        .success()
        .stderr(predicate::str::contains("REBUILD(").not());
}

#[test]
fn test_missing_input_fails_with_diagnostic() {
    let project = Project::new();

    stepmark(&project)
        .args(["status", "sdl_patch", "-i", "patches"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Missing input")
                .and(predicate::str::contains("for step 'sdl_patch'")),
        );
}
