use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn version_prints_package_version() {
    let mut cmd = cargo_bin_cmd!("markdown2word");
    cmd.arg("version");
    cmd.assert().success().stdout(predicate::str::contains(format!(
        "markdown2word version {}",
        env!("CARGO_PKG_VERSION")
    )));
}

#[test]
fn convert_writes_docx_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("guide.md");
    std::fs::write(&input, "# Guide\n\nBody text.\n").unwrap();

    let mut cmd = cargo_bin_cmd!("markdown2word");
    cmd.arg("convert").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Converting").and(predicate::str::contains(
            "Successfully converted to",
        )));

    let output = dir.path().join("guide.docx");
    let bytes = std::fs::read(output).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn convert_honours_explicit_output_and_page_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.md");
    let output = dir.path().join("custom.docx");
    std::fs::write(&input, "text").unwrap();

    let mut cmd = cargo_bin_cmd!("markdown2word");
    cmd.arg("convert")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--page-size")
        .arg("legal");
    cmd.assert().success();
    assert!(output.exists());
}

#[test]
fn missing_input_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("markdown2word");
    cmd.arg("convert").arg(dir.path().join("nope.md"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("input file does not exist"));
}

#[test]
fn non_markdown_extension_only_warns() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "plain").unwrap();

    let mut cmd = cargo_bin_cmd!("markdown2word");
    cmd.arg("convert").arg(&input);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("does not have a .md or .markdown extension"));
    assert!(dir.path().join("notes.docx").exists());
}
