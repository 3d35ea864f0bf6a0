mod common;

use common::TestResult;
use common::fixtures::{order, users};
use jstream::{JsonStream, StreamError};
use serde_json::{Value, json};
use std::io::{Cursor, Write};
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

#[test]
fn test_reads_document_from_file() -> TestResult {
    let mut file = NamedTempFile::new()?;
    serde_json::to_writer(&mut file, &users())?;
    file.flush()?;

    let names = JsonStream::from_path(file.path())?
        .filter("profile.age < 40")?
        .map("name = name || \"!\"")?
        .into_value();
    assert_eq!(names, {
        let mut expected = users();
        if let Value::Array(items) = &mut expected {
            items.remove(0);
            items[0]["name"] = json!("Sara!");
            items[1]["name"] = json!("Reza!");
        }
        expected
    });
    Ok(())
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonStream::from_path(dir.path().join("absent.json")).unwrap_err();
    match err {
        StreamError::Io(e) => assert!(e.to_string().contains("absent.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_reader_and_pretty_output() -> TestResult {
    let text = serde_json::to_string(&order())?;
    let stream = JsonStream::from_reader(Cursor::new(text))?.apply("rename -> orderId = id")?;
    let pretty = stream.to_pretty_string()?;
    assert!(pretty.contains("\n  \"orderId\": 17"));
    assert_eq!(serde_json::from_str::<Value>(&pretty)?, stream.into_value());
    Ok(())
}

#[test]
fn test_cli_reads_stdin_and_applies_operations() -> TestResult {
    let mut child = Command::new(env!("CARGO_BIN_EXE_jstream"))
        .args(["filter -> age > 30", "map -> senior = true"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or("stdin not captured")?
        .write_all(br#"[{"age": 45}, {"age": 12}]"#)?;
    let output = child.wait_with_output()?;

    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(result, json!([{ "age": 45, "senior": true }]));
    Ok(())
}

#[test]
fn test_cli_fails_on_bad_operation() -> TestResult {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"{\"a\": 1}")?;
    file.flush()?;

    let output = Command::new(env!("CARGO_BIN_EXE_jstream"))
        .arg("-i")
        .arg(file.path())
        .arg("filter -> a == 1")
        .output()?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected array"));
    Ok(())
}
