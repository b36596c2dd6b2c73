use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn firstmatch() -> Command {
    Command::cargo_bin("firstmatch").unwrap()
}

fn records_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_staff_record_from_file() {
    let file = records_file("{\"kind\":\"staff\",\"name\":\"jack\",\"id\":1}\n");
    firstmatch()
        .arg(file.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("clause 2 [staff if id > 0]: fellow jack, id is 1"))
        .stdout(predicate::str::contains("1 records: 1 matched, 0 unmatched"));
}

#[test]
fn test_stdin_and_unmatched_record() {
    firstmatch()
        .arg("--no-color")
        .arg("--sequential")
        .write_stdin("{\"kind\":\"relative\",\"name\":\"tim\",\"age\":9}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("line 1 (relative) no clause matched"))
        .stdout(predicate::str::contains("0 matched, 1 unmatched"));
}

#[test]
fn test_json_output() {
    let file = records_file(
        "{\"kind\":\"staff\",\"name\":\"jill\",\"id\":0}\n\n{\"kind\":\"relative\",\"name\":\"ann\",\"age\":40}\n",
    );
    firstmatch()
        .arg(file.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"line":1,"kind":"staff","clause":3,"message":"jill, id is 0","attempted":3}"#,
        ))
        .stdout(predicate::str::contains(
            r#"{"line":3,"kind":"relative","clause":1,"message":"I'm ann, my age is 40","attempted":1}"#,
        ));
}

#[test]
fn test_malformed_line_fails() {
    let file = records_file("{\"kind\":\"staff\"}\nnot json\n");
    firstmatch()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse record on line 2"));
}

#[test]
fn test_missing_file_fails() {
    firstmatch()
        .arg("/nonexistent/records.jsonl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input"));
}

#[test]
fn test_empty_input() {
    firstmatch()
        .write_stdin("\n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("No records found in stdin"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    firstmatch()
        .arg("-vv")
        .arg("--no-color")
        .env_remove("RUST_LOG")
        .write_stdin("{\"kind\":\"staff\",\"name\":\"jack\",\"id\":1}\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("clause fired"));
}
