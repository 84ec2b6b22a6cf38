//! End-to-end tests for the cxx-tags binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use cxx_tags::read_sections;

#[allow(deprecated)]
fn cxx_tags() -> Command {
    Command::cargo_bin("cxx-tags").expect("Failed to find cxx-tags binary")
}

fn project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("src/main.c"),
        "#include <stdio.h>\n#include \"util.h\"\n\nint main(void) {\n  return helper(1);\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("src/util.h"),
        "#define UTIL_H 1\nint helper(int x);\nstatic inline int twice(int x) { return 2 * x; }\n",
    )
    .unwrap();
    dir
}

// ============================================================================
// Option parsing
// ============================================================================

#[test]
fn test_help_lists_options() {
    cxx_tags()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--quiet"))
        .stdout(predicate::str::contains("--nostdinc"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_unknown_option_fails_without_output() {
    let dir = project();
    cxx_tags()
        .current_dir(dir.path())
        .arg("--bogus")
        .assert()
        .failure();
    assert!(!dir.path().join("TAGS").exists());
}

#[test]
fn test_unknown_language_fails_without_output() {
    let dir = project();
    cxx_tags()
        .current_dir(dir.path())
        .args(["-x", "fortran"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fortran"));
    assert!(!dir.path().join("TAGS").exists());
}

#[test]
fn test_invalid_config_fails() {
    let dir = project();
    fs::write(dir.path().join(".cxx-tags.toml"), "nostdinc = \"maybe\"\n").unwrap();
    cxx_tags()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(".cxx-tags.toml"));
    assert!(!dir.path().join("TAGS").exists());
}

#[test]
fn test_unwritable_output_fails() {
    let dir = project();
    cxx_tags()
        .current_dir(dir.path())
        .args(["-o", "missing/dir/TAGS", "src"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing/dir/TAGS"));
}

// ============================================================================
// Indexing
// ============================================================================

#[test]
fn test_default_run_writes_tags_in_current_directory() {
    let dir = project();
    cxx_tags()
        .current_dir(dir.path())
        .arg("--nostdinc")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done"));

    let data = fs::read(dir.path().join("TAGS")).unwrap();
    let sections = read_sections(&data).unwrap();
    let files: Vec<&str> = sections.iter().map(|s| s.file.as_str()).collect();
    assert_eq!(files, vec!["./src/main.c", "./src/util.h"]);

    let names: Vec<&str> = sections
        .iter()
        .flat_map(|s| s.records.iter().map(|r| r.name.as_str()))
        .collect();
    assert_eq!(names, vec!["main", "UTIL_H", "twice"]);
}

#[test]
fn test_missing_includes_are_reported() {
    let dir = project();
    cxx_tags()
        .current_dir(dir.path())
        .args(["--nostdinc", "src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("could not be found"))
        .stdout(predicate::str::contains("stdio.h"))
        .stdout(predicate::str::contains("-I"))
        .stdout(predicate::str::contains("util.h").not());
}

#[test]
fn test_quiet_prints_nothing() {
    let dir = project();
    cxx_tags()
        .current_dir(dir.path())
        .args(["-q", "--nostdinc", "-o", "out.TAGS", "src"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(dir.path().join("out.TAGS").exists());
}

#[test]
fn test_progress_dots() {
    let dir = TempDir::new().unwrap();
    for i in 0..12 {
        fs::write(dir.path().join(format!("f{i:02}.c")), format!("int v{i} = {i};\n")).unwrap();
    }
    cxx_tags()
        .current_dir(dir.path())
        .arg("--nostdinc")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("..........10..\nDone"));
}

#[test]
fn test_config_file_supplies_output_and_includes() {
    let dir = project();
    fs::create_dir(dir.path().join("vendor")).unwrap();
    fs::write(dir.path().join("vendor/stdio.h"), "int printf(const char *, ...);\n").unwrap();
    fs::write(
        dir.path().join(".cxx-tags.toml"),
        "include = [\"vendor\"]\noutput = \"project.TAGS\"\nnostdinc = true\n",
    )
    .unwrap();

    cxx_tags()
        .current_dir(dir.path())
        .arg("src")
        .assert()
        .success()
        .stdout(predicate::str::contains("could not be found").not());
    assert!(dir.path().join("project.TAGS").exists());
    assert!(!dir.path().join("TAGS").exists());
}
