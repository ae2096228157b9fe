use regex::Regex;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn write(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_keylayout"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_frames_table() {
    let output = run(&["frames", "--width", "375", "--height", "216"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Keyboard: qwerty (letters)"), "{}", text);
    // space key row: label, then x y w h
    let space = Regex::new(r"\|\s*space\s*\|\s*space\s*\|\s*92\.0\s*\|\s*170\.0\s*\|\s*191\.5\s*\|\s*43\.0\s*\|")
        .unwrap();
    assert!(space.is_match(&text), "{}", text);
}

#[test]
fn test_frames_csv_has_a_line_per_key() {
    let output = run(&["frames", "--format", "csv"]);
    assert!(output.status.success());

    let text = stdout(&output);
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("key,row,column,kind,label,x,y,width,height"));
    assert_eq!(lines.count(), 32);
}

#[test]
fn test_frames_json_reports_flipped_popups() {
    let output = run(&["frames", "--format", "json", "--page", "1"]);
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 31);

    let first = &records[0];
    assert_eq!(first["label"], "1");
    assert_eq!(first["popup_attached"], "down");
    assert_eq!(first["popup_y"], 3.0);
}

#[test]
fn test_frames_from_keyboard_file() {
    let ctx = TestContext::new();
    let path = ctx.write(
        "tiny.json",
        r#"{ "name": "tiny", "pages": [ { "rows": [
            [ { "type": "character", "lowercase_keycap": "x" } ],
            [ { "type": "space", "lowercase_keycap": "space" } ]
        ] } ] }"#,
    );

    let output = run(&["--keyboard", &path, "frames", "--format", "csv"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 3);
}

#[test]
fn test_constants_override_changes_frames() {
    let ctx = TestContext::new();
    let path = ctx.write("constants.json", r#"{ "top_edge_portrait": { "values": [20.0], "thresholds": [] } }"#);

    let output = run(&["--constants", &path, "frames", "--format", "json"]);
    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(records[0]["y"], 20.0);
}

#[test]
fn test_invalid_constants_exit_with_error() {
    let ctx = TestContext::new();
    let path = ctx.write("bad.json", r#"{ "popup_total_height": { "values": [1.0], "thresholds": [350.0] } }"#);

    let output = run(&["--constants", &path, "frames"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_keyboard_file_exits_with_error() {
    let output = run(&["--keyboard", "/nonexistent/board.json", "frames"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_zero_width_exits_with_error() {
    let output = run(&["frames", "--width", "0"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_negative_height_exits_with_error() {
    let output = run(&["frames", "--height=-216"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_zero_scale_exits_with_error() {
    let output = run(&["frames", "--scale", "0"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pixel scale"), "{}", stderr);
}

#[test]
fn test_constants_json() {
    let output = run(&["constants", "--width", "375", "--format", "json"]);
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(v["popup_total_height"], 108.0);
    assert_eq!(v["portrait"]["top_edge"], 10.0);
    assert_eq!(v["portrait"]["last_row_gap"], 9.0);
    assert_eq!(v["landscape"]["row_gap"], 7.0);
}

#[test]
fn test_constants_table() {
    let output = run(&["constants", "--width", "414"]);
    assert!(output.status.success());

    let text = stdout(&output);
    let row = Regex::new(r"\|\s*side_edges\s*\|\s*4\s*\|\s*3\s*\|").unwrap();
    assert!(row.is_match(&text), "{}", text);
}

#[test]
fn test_constants_shrink_wide_portrait_bounds() {
    let output = run(&["constants", "--width", "812", "--format", "json"]);
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(v["portrait"]["keyboard_width"], 524.0);
    assert_eq!(v["landscape"]["keyboard_width"], 524.0);
}
