//! Binary integration tests for the `quiznote` CLI

use assert_cmd::Command;
use predicates::prelude::*;
use royalbit_quiznote::excel::{ExcelExporter, ExcelImporter};
use royalbit_quiznote::types::{CellValue, Table};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn quiznote() -> Command {
    Command::cargo_bin("quiznote").unwrap()
}

fn write_sheet(dir: &Path, name: &str, columns: &[&str], rows: &[&str]) -> PathBuf {
    let mut table = Table::new("Sheet1", columns.iter().map(|c| c.to_string()).collect());
    for row in rows {
        table.push_row(vec![(*row).into()]);
    }
    let path = dir.join(name);
    ExcelExporter::new(&table).export(&path).unwrap();
    path
}

#[test]
fn test_inspect_valid_sheet() {
    let dir = TempDir::new().unwrap();
    let file = write_sheet(dir.path(), "q.xlsx", &["Question"], &["a", "b"]);

    quiznote()
        .arg("inspect")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("question sheet is valid"));
}

#[test]
fn test_inspect_missing_column_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_sheet(dir.path(), "q.xlsx", &["Prompt"], &["a"]);

    quiznote()
        .arg("inspect")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must contain a 'Question' column"));
}

#[test]
fn test_draw_prints_question_from_sheet() {
    let dir = TempDir::new().unwrap();
    let file = write_sheet(dir.path(), "q.xlsx", &["Question"], &["only question"]);

    quiznote()
        .args(["draw", "--seed", "3"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("only question"));
}

#[test]
fn test_draw_missing_file_reports_not_found() {
    quiznote()
        .args(["draw", "/definitely/not/here.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_note_writes_updated_file() {
    let dir = TempDir::new().unwrap();
    let file = write_sheet(dir.path(), "q.xlsx", &["Question"], &["What is 2+2?", "Capital of France?"]);
    let output = dir.path().join("updated_file.xlsx");

    quiznote()
        .arg("note")
        .arg(&file)
        .args(["--question", "Capital of France?", "--note", "Paris"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Note saved successfully!"));

    let updated = ExcelImporter::new(&output).import().unwrap();
    assert_eq!(updated.row_count(), 3);
    assert_eq!(updated.get(2, "Question"), Some(&CellValue::text("Capital of France?")));
    assert_eq!(updated.get(2, "Note"), Some(&CellValue::text("Paris")));

    // Source file untouched
    assert_eq!(ExcelImporter::new(&file).import().unwrap().row_count(), 2);
}

#[test]
fn test_note_blank_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = write_sheet(dir.path(), "q.xlsx", &["Question"], &["q1"]);
    let output = dir.path().join("out.xlsx");

    quiznote()
        .arg("note")
        .arg(&file)
        .args(["--note", "   "])
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a note before saving."));
    assert!(!output.exists());
}

#[test]
fn test_note_refuses_to_overwrite_source() {
    let dir = TempDir::new().unwrap();
    let file = write_sheet(dir.path(), "q.xlsx", &["Question"], &["q1"]);

    quiznote()
        .arg("note")
        .arg(&file)
        .args(["--note", "Easy"])
        .arg("-o")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is the source workbook"));

    let untouched = ExcelImporter::new(&file).import().unwrap();
    assert_eq!(untouched.row_count(), 1);
    assert!(!untouched.has_column("Note"));
}

#[test]
fn test_session_over_stdin() {
    let dir = TempDir::new().unwrap();
    let file = write_sheet(dir.path(), "q.xlsx", &["Question"], &["What is 2+2?"]);
    let output = dir.path().join("session.xlsx");

    quiznote()
        .arg("session")
        .arg(&file)
        .arg("-o")
        .arg(&output)
        .write_stdin("draw\nnote Easy\nsave\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("What is 2+2?"));

    let updated = ExcelImporter::new(&output).import().unwrap();
    assert_eq!(updated.get(1, "Note"), Some(&CellValue::text("Easy")));
}
