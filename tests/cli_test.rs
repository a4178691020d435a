//! Command line behaviour tests
//!
//! Runs the application entry point with parsed arguments and checks
//! output and exit codes for the modes that never touch a speech backend.

use clap::Parser;
use novelreader::app::{exit_code, run};
use novelreader::cli::{normalize_args, Args};
use novelreader::NovelReaderError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn args(dir: &Path, extra: &[&str]) -> Args {
    let config = dir.join("novelreader.cfg");
    let mut argv = vec!["novelreader", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(extra);
    Args::try_parse_from(normalize_args(argv)).unwrap()
}

fn run_capture(args: &Args) -> (novelreader::Result<()>, String) {
    let mut out = Vec::new();
    let result = run(args, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn write_story(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("story.txt");
    std::fs::write(
        &path,
        "The house was quiet.\n\n\
         \"Is anyone home?\" Lucy asked, \"Hello?\"\n\n\
         \"In here,\" Robert whispered.\n\n\
         A floorboard creaked somewhere above them, long and slow, as if the whole house were \
         settling into a new shape for the night.\n\n\
         \"Stay close,\" Robert said.\n",
    )
    .unwrap();
    path
}

#[test]
fn test_list_voices_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let (result, out) = run_capture(&args(dir.path(), &["-lv"]));

    assert_eq!(exit_code(&result), 0);
    assert!(out.contains("NovelReader Voice Options:"));
    for key in ["narrator", "male_1", "female_1", "male_2", "female_2", "child", "elderly"] {
        assert!(out.contains(key), "missing {} in catalog", key);
    }
}

#[test]
fn test_missing_file_flag() {
    let dir = tempfile::tempdir().unwrap();
    let (result, _) = run_capture(&args(dir.path(), &[]));

    assert!(matches!(result, Err(NovelReaderError::Input(_))));
    assert_eq!(exit_code(&result), 1);
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    let (result, _) = run_capture(&args(dir.path(), &["--file", missing.to_str().unwrap()]));

    match &result {
        Err(NovelReaderError::Input(msg)) => assert!(msg.contains("not found")),
        other => panic!("expected input error, got {:?}", other),
    }
    assert_eq!(exit_code(&result), 1);
}

#[test]
fn test_preview_reports_first_three_segments() {
    let dir = tempfile::tempdir().unwrap();
    let story = write_story(&dir);
    let (result, out) = run_capture(&args(dir.path(), &["-f", story.to_str().unwrap(), "-p"]));

    assert_eq!(exit_code(&result), 0);
    assert!(out.contains("5 segments found"));
    assert!(out.contains("  2 narrative segments"));
    assert!(out.contains("  3 dialogue segments"));
    assert!(out.contains("Characters detected: lucy, robert"));

    let preview: Vec<&str> = out
        .lines()
        .skip_while(|line| !line.starts_with("--- PREVIEW"))
        .skip(1)
        .collect();
    assert_eq!(
        preview,
        vec![
            "1. [NARRATIVE] narrator: The house was quiet.",
            "2. [DIALOGUE] lucy: Is anyone home?",
            "3. [DIALOGUE] robert: In here",
        ]
    );
}

#[test]
fn test_preview_truncates_long_segments() {
    let dir = tempfile::tempdir().unwrap();
    let story = dir.path().join("long.txt");
    let paragraph = "word ".repeat(60);
    std::fs::write(&story, &paragraph).unwrap();

    let (result, out) = run_capture(&args(dir.path(), &["-f", story.to_str().unwrap(), "-p"]));
    assert!(result.is_ok());

    let line = out
        .lines()
        .find(|line| line.starts_with("1. [NARRATIVE]"))
        .unwrap();
    let shown = line.trim_start_matches("1. [NARRATIVE] narrator: ");
    assert!(shown.ends_with("..."));
    assert_eq!(shown.chars().count(), 103);
}

#[test]
fn test_preview_json() {
    let dir = tempfile::tempdir().unwrap();
    let story = write_story(&dir);
    let (result, out) = run_capture(&args(
        dir.path(),
        &["-f", story.to_str().unwrap(), "--preview", "--json"],
    ));

    assert!(result.is_ok());
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["total"], 5);
    assert_eq!(value["dialogue"], 3);
    assert_eq!(value["segments"].as_array().unwrap().len(), 5);
}

#[test]
fn test_output_with_no_google_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let story = write_story(&dir);
    let output = dir.path().join("story.wav");
    let (result, _) = run_capture(&args(
        dir.path(),
        &[
            "-f",
            story.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--no-google",
        ],
    ));

    assert!(matches!(result, Err(NovelReaderError::Config(_))));
    assert_eq!(exit_code(&result), 1);
    assert!(!output.exists());
}
