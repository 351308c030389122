use predicates::prelude::*;
use serde_json::Value;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_docgen")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_json_tree() {
    let input = std::fs::read_to_string(fixture_path("stats.js")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let output: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    let mean = &output["stats"]["children"]["location"]["children"]["mean"]["entry"];
    assert_eq!(mean["type"], "method");
    assert_eq!(mean["file"], "<stdin>");
    assert_eq!(mean["line"], 14);
    assert_eq!(mean["params"][1]["name"], "skipNaN");
    assert_eq!(mean["examples"][0], "stats.location.mean([1, 2, 3])");
    assert_eq!(output["stats"]["children"]["_buffer"]["entry"]["type"], "var");
}

#[test]
fn stdin_html_format() {
    let input = std::fs::read_to_string(fixture_path("stats.js")).unwrap();

    cmd()
        .args(["-f", "html", "-n", "stats-js"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<title>stats-js</title>"))
        .stdout(predicate::str::contains("<pre>stats.location.mean(values[, skipNaN])</pre>"));
}

#[test]
fn stdin_parse_error_fails() {
    cmd()
        .write_stdin("/**\n * @method\n */\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing content for @method at line 2"));
}

#[test]
fn stdin_without_blocks_is_empty_object() {
    cmd()
        .write_stdin("const x = 1\n")
        .assert()
        .success()
        .stdout("{}\n");
}

// -- file mode --

#[test]
fn file_mode_writes_json_and_search_index() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("stats.js"))
        .arg(fixture_path("spread.js"))
        .assert()
        .success();

    let api = read_json(&dir.path().join("api.json"));
    assert_eq!(
        api["stats"]["children"]["variance"]["entry"]["file"],
        fixture_path("spread.js")
    );

    // siblings from different files are ordered by source line
    let index = read_json(&dir.path().join("search.json"));
    assert_eq!(
        index,
        serde_json::json!(["stats", "stats.variance", "stats.location", "stats.location.mean"])
    );
}

#[test]
fn file_mode_creates_output_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("site/api");

    cmd()
        .args(["-o", nested.to_str().unwrap()])
        .arg(fixture_path("stats.js"))
        .assert()
        .success();

    assert!(nested.join("api.json").exists());
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("stats.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn file_mode_html_format() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "html"])
        .arg(fixture_path("stats.js"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(output.contains("<h2 id='api-stats.location'>stats.location</h2>"));
    assert!(output.contains("<code>optional</code>"));
    assert!(output.contains(r#"const SEARCH_LIST = ["stats","stats.location","stats.location.mean"];"#));
    assert!(!output.contains("_buffer"));
}

#[test]
fn invalid_format_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "xml"])
        .arg(fixture_path("stats.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn show_private_includes_hidden_blocks() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg("--show-private")
        .arg(fixture_path("stats.js"))
        .assert()
        .success();

    let index = read_json(&dir.path().join("search.json"));
    assert!(index.as_array().unwrap().contains(&Value::from("stats._buffer")));
}

#[test]
fn json_export_keeps_private_blocks() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("stats.js"))
        .assert()
        .success();

    let api = read_json(&dir.path().join("api.json"));
    let buffer = &api["stats"]["children"]["_buffer"]["entry"];
    assert_eq!(buffer["path"], "stats._buffer");
    assert!(buffer["tags"].get("private").is_some());

    let index = read_json(&dir.path().join("search.json"));
    assert!(!index.as_array().unwrap().contains(&Value::from("stats._buffer")));
}

#[test]
fn template_option() {
    let dir = TempDir::new().unwrap();
    let mut template = NamedTempFile::new().unwrap();
    template
        .write_all(b"<nav id=\"{{NAME_SIMPLIFIED}}\">{{API_MENU}}</nav>")
        .unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "html", "-n", "stats-js"])
        .args(["-t", template.path().to_str().unwrap()])
        .arg(fixture_path("stats.js"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(output.starts_with("<nav id=\"statsjs\"><input id='s1-stats'"));
    assert!(output.contains("<a href='#api-stats.location.mean'>mean</a>"));
}

// -- failure handling --

#[test]
fn unterminated_block_aborts() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("broken.js"))
        .arg(fixture_path("stats.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unterminated block starting at line 1"));

    assert!(!dir.path().join("api.json").exists());
}

#[test]
fn keep_going_skips_failing_files() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg("--keep-going")
        .arg(fixture_path("broken.js"))
        .arg(fixture_path("stats.js"))
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: skipping"));

    let api = read_json(&dir.path().join("api.json"));
    assert!(api["stats"]["children"].get("lost").is_none());
    assert!(api["stats"]["children"].get("location").is_some());
}

#[test]
fn duplicates_last_wins_by_default() {
    let dir = TempDir::new().unwrap();

    // shadow.js sorts before stats.js, so stats.js is inserted last
    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("stats.js"))
        .arg(fixture_path("shadow.js"))
        .assert()
        .success();

    let api = read_json(&dir.path().join("api.json"));
    let mean = &api["stats"]["children"]["location"]["children"]["mean"]["entry"];
    assert_eq!(mean["desc"], "Arithmetic mean of a sample.");
}

#[test]
fn duplicates_first_wins() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["--on-duplicate", "first"])
        .arg(fixture_path("stats.js"))
        .arg(fixture_path("shadow.js"))
        .assert()
        .success();

    let api = read_json(&dir.path().join("api.json"));
    let mean = &api["stats"]["children"]["location"]["children"]["mean"]["entry"];
    assert_eq!(mean["desc"], "Another mean.");
}

#[test]
fn duplicates_rejected_on_error_policy() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["--on-duplicate", "error"])
        .arg(fixture_path("stats.js"))
        .arg(fixture_path("shadow.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate path 'stats.location.mean'"));
}

#[test]
fn directory_input_is_scanned() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    std::fs::copy(fixture_path("stats.js"), src.path().join("stats.js")).unwrap();
    std::fs::write(src.path().join("README.md"), "/**\n").unwrap();

    cmd()
        .args(["-o", out.path().to_str().unwrap()])
        .arg(src.path().to_str().unwrap())
        .assert()
        .success();

    let index = read_json(&out.path().join("search.json"));
    assert_eq!(index.as_array().unwrap().len(), 3);
}
