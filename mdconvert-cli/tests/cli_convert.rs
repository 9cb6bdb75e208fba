use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const DOC: &str = "---\ntitle: Release Notes\nauthor: Docs Team\n---\n\n# Release Notes\n\n```rust\nfn main() {}\n```\n\n## Layout\n\n```\n+-----+-----+\n| api | web |\n+-----+-----+\n```\n";

#[allow(deprecated)]
fn md_converter() -> Command {
    Command::cargo_bin("md-converter").unwrap()
}

#[test]
fn convert_to_html_next_to_input() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("notes.md");
    fs::write(&input, DOC)?;

    md_converter()
        .current_dir(dir.path())
        .args(["convert", "notes.md", "-f", "html", "--ascii-mode", "preserve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.html"));

    let html = fs::read_to_string(dir.path().join("notes.html"))?;
    assert!(html.contains("Release Notes"));
    assert!(html.contains("Docs Team"));
    assert!(html.contains(r#"<pre class="ascii-art">"#));
    Ok(())
}

#[test]
fn convert_with_explicit_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("notes.md"), DOC)?;
    fs::create_dir_all(dir.path().join("out"))?;

    md_converter()
        .current_dir(dir.path())
        .args(["convert", "notes.md", "-f", "html", "-o", "out/final.html"])
        .assert()
        .success();

    assert!(dir.path().join("out/final.html").exists());
    Ok(())
}

#[test]
fn batch_continues_past_failures() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let docs = dir.path().join("docs");
    fs::create_dir_all(&docs)?;
    fs::write(docs.join("a.md"), "# A\n")?;
    fs::write(docs.join("b.markdown"), "# B\n")?;

    md_converter()
        .current_dir(dir.path())
        .args(["convert", "docs", "missing.md", "--batch", "-f", "html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 3 file(s) failed"));

    assert!(docs.join("a.html").exists());
    assert!(docs.join("b.html").exists());
    Ok(())
}

#[test]
fn directory_requires_batch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("docs"))?;

    md_converter()
        .current_dir(dir.path())
        .args(["convert", "docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--batch"));
    Ok(())
}

#[test]
fn help_shows_convert_invocation() {
    md_converter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("md-converter convert input.md -o out.pdf"));
}

#[test]
fn unknown_style_is_rejected() {
    md_converter()
        .args(["convert", "x.md", "--style", "gothic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gothic"));
}

#[test]
fn inspect_json_lists_blocks() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("notes.md"), DOC)?;

    let output = md_converter()
        .current_dir(dir.path())
        .args(["inspect", "notes.md", "--json"])
        .output()?;
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["metadata"]["title"], "Release Notes");
    assert_eq!(value["code_blocks"].as_array().unwrap().len(), 2);
    assert_eq!(value["code_blocks"][0]["language"], "rust");
    assert_eq!(value["code_blocks"][1]["language"], "text");
    assert_eq!(value["ascii_blocks"].as_array().unwrap().len(), 1);
    assert_eq!(value["ascii_blocks"][0]["is_diagram"], false);
    Ok(())
}

#[test]
fn toc_prints_headings() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("notes.md"), DOC)?;

    md_converter()
        .current_dir(dir.path())
        .args(["toc", "notes.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r##"<a href="#layout">Layout</a>"##));
    Ok(())
}

#[test]
fn config_file_sets_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("notes.md"), DOC)?;
    fs::write(
        dir.path().join("mdconvert.yml"),
        "output:\n  format: html\n  style: minimal\n  toc: true\n",
    )?;

    md_converter()
        .current_dir(dir.path())
        .args(["convert", "notes.md"])
        .assert()
        .success();

    let html = fs::read_to_string(dir.path().join("notes.html"))?;
    assert!(html.contains("/* minimal */"));
    assert!(html.contains("toc-list"));
    Ok(())
}
