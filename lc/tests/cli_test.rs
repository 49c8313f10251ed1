//! Binary-level tests for the `lc` subcommands

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `lc` isolated in `dir`: no user config, logs under `dir`, no colors
fn lc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lc").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_DATA_HOME", dir.join("data"))
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn add_dune(dir: &Path) {
    lc(dir)
        .args([
            "add",
            "--isbn",
            "1234567890123",
            "--title",
            "Dune",
            "--authors",
            "Frank Herbert",
            "--year",
            "1965",
            "--genre",
            "Science Fiction",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: Dune"));
}

#[test]
fn test_add_creates_file_and_show_reads_it() {
    let temp = TempDir::new().unwrap();
    add_dune(temp.path());

    assert_eq!(
        fs::read_to_string(temp.path().join("books.db")).unwrap(),
        "1234567890123|Dune|Frank Herbert|1965|Science Fiction|false|-\n"
    );

    lc(temp.path())
        .args(["show", "1234567890123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Dune"))
        .stdout(predicate::str::contains("Borrowed: false"))
        .stdout(predicate::str::contains("Date: -"));
}

#[test]
fn test_file_flag_overrides_default_path() {
    let temp = TempDir::new().unwrap();
    lc(temp.path())
        .args(["--file", "shelf/catalog.txt", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No books in the catalog"));

    assert!(temp.path().join("shelf").join("catalog.txt").exists());
    assert!(!temp.path().join("books.db").exists());
}

#[test]
fn test_config_file_sets_catalog_path() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".librarycatalog.yml"), "catalog-file: library.db\n").unwrap();

    add_dune(temp.path());
    assert!(temp.path().join("library.db").exists());
}

#[test]
fn test_borrow_twice_fails() {
    let temp = TempDir::new().unwrap();
    add_dune(temp.path());

    lc(temp.path())
        .args(["borrow", "1234567890123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Borrowed: Dune"));

    lc(temp.path())
        .args(["borrow", "1234567890123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already borrowed"));

    let content = fs::read_to_string(temp.path().join("books.db")).unwrap();
    assert!(content.contains("|true|"));
}

#[test]
fn test_return_not_borrowed_fails() {
    let temp = TempDir::new().unwrap();
    add_dune(temp.path());

    lc(temp.path())
        .args(["return", "1234567890123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("was not borrowed"));
}

#[test]
fn test_unknown_isbn_fails() {
    let temp = TempDir::new().unwrap();
    lc(temp.path())
        .args(["delete", "0000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_add_rejects_bad_isbn() {
    let temp = TempDir::new().unwrap();
    lc(temp.path())
        .args(["add", "--isbn", "12345", "--title", "Short", "--year", "2000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly 13 digits"));

    assert_eq!(fs::read_to_string(temp.path().join("books.db")).unwrap(), "");
}

#[test]
fn test_find_is_case_insensitive() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("books.db"),
        "9780132350884|Clean Code|Robert C. Martin|2008|Programming|false|-\n\
         9780201485677|Refactoring|Martin Fowler|1999|Programming|false|-\n",
    )
    .unwrap();

    lc(temp.path())
        .args(["find", "code"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Clean Code (ISBN: 9780132350884)"))
        .stdout(predicate::str::contains("Refactoring").not());

    lc(temp.path())
        .args(["find", "z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No books found"));
}

#[test]
fn test_malformed_line_warns_and_continues() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("books.db"),
        "9780132350884|Clean Code|Robert C. Martin|2008|Programming|false|-\n\
         9780201485677|Refactoring|Martin Fowler|1999|Programming\n",
    )
    .unwrap();

    lc(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean Code"))
        .stderr(predicate::str::contains("skipped line 2: missing borrowed field"));
}

#[test]
fn test_borrowed_json() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("books.db"),
        "9780132350884|Clean Code|Robert C. Martin|2008|Programming|false|-\n\
         9780201485677|Refactoring|Martin Fowler|1999|Programming|true|14-02-2025\n",
    )
    .unwrap();

    let output = lc(temp.path()).args(["borrowed", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let books = value.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Refactoring");
    assert_eq!(books[0]["loan"]["since"], "2025-02-14");
}
