//! Architecture guard tests for bookfeed-core.
//!
//! These tests scan library sources to keep a few conventions in place:
//! - Error types derive `thiserror::Error`
//! - No `Result<_, String>`; fallible APIs return `FeedResult`
//! - No `unwrap()` / `expect()` outside tests
//! - No `println!` / `eprintln!`; the library logs through `tracing`
//!
//! Run: `cargo test --package bookfeed-core --test architecture_guards`

use std::fs;
use std::path::{Path, PathBuf};

/// Walk `dir` recursively, collecting non-test `.rs` files.
fn library_sources(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(library_sources(&path));
            } else if path.extension().is_some_and(|e| e == "rs")
                && path.file_name().is_none_or(|name| name != "tests.rs")
            {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

fn crate_src() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Code lines of a file up to its inline test module, without comments
fn code_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.starts_with("//"))
}

/// Run `check` on every code line; panic listing all hits
fn guard(rule: &str, advice: &str, check: impl Fn(&str) -> bool) {
    let src = crate_src();
    let mut violations = Vec::new();

    for file in library_sources(&src) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        let relative = file.strip_prefix(&src).unwrap_or(&file).display().to_string();
        for (line_no, line) in code_lines(&content) {
            if check(line) {
                violations.push(format!("  src/{}:{} -> {}", relative, line_no, line));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "\n[{}] {}\n\n{}\n",
        rule,
        advice,
        violations.join("\n")
    );
}

#[test]
fn test_error_types_use_thiserror() {
    guard(
        "ERR-01",
        "Hand-written Display for an error type. Use #[derive(thiserror::Error)].",
        |line| line.starts_with("impl") && line.contains("Display for") && line.contains("Error"),
    );
}

#[test]
fn test_no_result_string() {
    guard(
        "ERR-02",
        "Result<_, String> found. Return FeedResult instead.",
        |line| {
            line.find("Result<")
                .map(|pos| line[pos..].contains(", String>"))
                .unwrap_or(false)
        },
    );
}

#[test]
fn test_no_unwrap_outside_tests() {
    guard(
        "ERR-03",
        "unwrap()/expect() in library code. Propagate the error with `?`.",
        |line| line.contains(".unwrap()") || line.contains(".expect("),
    );
}

#[test]
fn test_library_does_not_print() {
    guard(
        "LOG-01",
        "Direct printing in library code. Use tracing macros.",
        |line| line.contains("println!(") || line.contains("eprintln!("),
    );
}

#[test]
fn test_sources_are_found() {
    let files = library_sources(&crate_src());
    assert!(files.iter().any(|f| f.ends_with("lib.rs")));
    assert!(files.iter().all(|f| !f.ends_with("tests.rs")));
}
