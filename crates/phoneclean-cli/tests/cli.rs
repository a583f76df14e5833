use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTACTS: &str = "Name,Mobile,Alt Phone,Age\n\
Ada,+91 98765 43210,,34\n\
Grace,09876543210,8765432109,29\n\
Katherine,12345,,41\n\
Hedy,,7.0123456789E9,38\n";

fn write_contacts(dir: &Path) -> PathBuf {
    let path = dir.join("contacts.csv");
    fs::write(&path, CONTACTS).expect("write contacts");
    path
}

fn run_cmd_json(config_dir: &Path, args: &[&str]) -> Value {
    let output = cargo_bin_cmd!("phoneclean")
        .env("XDG_CONFIG_HOME", config_dir)
        .arg("--json")
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

#[test]
fn cli_detect_lists_phone_columns() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());

    let detected = run_cmd_json(temp.path(), &["detect", input.to_str().expect("path")]);
    assert_eq!(detected["detected_phone_columns"][0], "Mobile");
    assert_eq!(detected["detected_phone_columns"][1], "Alt Phone");
    assert_eq!(detected["detected_phone_columns"].as_array().map(Vec::len), Some(2));
    assert_eq!(detected["total_rows"], 4);
}

#[test]
fn cli_preview_limits_rows() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());

    let preview = run_cmd_json(
        temp.path(),
        &["preview", input.to_str().expect("path"), "--rows", "2"],
    );
    assert_eq!(preview["total_rows"], 4);
    let rows = preview["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Name"], "Ada");
    assert!(rows[0]["Alt Phone"].is_null());
}

#[test]
fn cli_clean_merges_and_writes_outputs() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());
    let out = temp.path().join("out.csv");
    let report = temp.path().join("report.txt");

    let summary = run_cmd_json(
        temp.path(),
        &[
            "clean",
            input.to_str().expect("path"),
            "--merge",
            "--drop-empty",
            "--out",
            out.to_str().expect("path"),
            "--report",
            report.to_str().expect("path"),
        ],
    );
    assert_eq!(summary["cleaned_columns"][0], "merged_phone");
    assert_eq!(summary["metrics"]["total_records"], 4);
    assert_eq!(summary["metrics"]["invalid_removed"], 1);
    assert_eq!(summary["metrics"]["duplicates_removed"], 1);
    assert_eq!(summary["metrics"]["rows_after_cleaning"], 2);
    assert_eq!(summary["metrics"]["valid_numbers"], 2);

    let written = fs::read_to_string(&out).expect("read output");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "Name,Mobile,Alt Phone,Age,merged_phone");
    assert_eq!(lines[1], "Ada,+91 98765 43210,,34,9876543210");
    assert_eq!(lines[2], "Hedy,,7.0123456789E9,38,7012345679");

    let text = fs::read_to_string(&report).expect("read report");
    assert!(text.contains("Original File     : contacts.csv"));
}

#[test]
fn cli_clean_defaults_output_next_to_input() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());

    cargo_bin_cmd!("phoneclean")
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["clean", input.to_str().expect("path"), "--column", "Mobile"])
        .assert()
        .success();

    let written =
        fs::read_to_string(temp.path().join("contacts_cleaned.csv")).expect("default output");
    assert!(written.starts_with("Name,Mobile,Alt Phone,Age,Mobile_cleaned\n"));
}

#[test]
fn cli_clean_whatsapp_format_from_config() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());
    let config = temp.path().join("phoneclean.toml");
    fs::write(&config, "[format]\nwhatsapp_format = true\n").expect("write config");
    let out = temp.path().join("wa.csv");

    cargo_bin_cmd!("phoneclean")
        .args([
            "--config",
            config.to_str().expect("path"),
            "clean",
            input.to_str().expect("path"),
            "--column",
            "Mobile",
            "--out",
            out.to_str().expect("path"),
        ])
        .assert()
        .success();

    let written = fs::read_to_string(&out).expect("read output");
    assert!(written.contains("Ada,+91 98765 43210,,34,+919876543210"));
}

#[test]
fn cli_clean_unknown_column_is_invalid_input() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());

    let output = cargo_bin_cmd!("phoneclean")
        .env("XDG_CONFIG_HOME", temp.path())
        .args([
            "--verbose",
            "clean",
            input.to_str().expect("path"),
            "--column",
            "Fax",
        ])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("column 'Fax' not found"), "stderr: {stderr}");
}

#[test]
fn cli_missing_file_is_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.path().join("missing.csv");

    cargo_bin_cmd!("phoneclean")
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["detect", missing.to_str().expect("path")])
        .assert()
        .code(2);
}

#[test]
fn cli_clean_spreadsheet_writes_csv() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_workbook(temp.path());

    let summary = run_cmd_json(temp.path(), &["clean", input.to_str().expect("path")]);
    assert_eq!(summary["filename"], "contacts.xlsx");
    assert_eq!(summary["cleaned_columns"][0], "Mobile_cleaned");
    assert_eq!(summary["metrics"]["total_records"], 3);
    assert_eq!(summary["metrics"]["valid_numbers"], 2);
    assert_eq!(summary["metrics"]["invalid_removed"], 1);

    let written =
        fs::read_to_string(temp.path().join("contacts_cleaned.csv")).expect("default output");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "Name,Mobile,Mobile_cleaned");
    assert_eq!(lines[1], "Ada,9876543210,9876543210");
    assert_eq!(lines[2], "Hedy,7.0123456789E9,7012345679");
    assert_eq!(lines[3], "Katherine,12345,");
}

#[test]
fn cli_rejects_legacy_spreadsheet() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("contacts.xls");
    fs::write(&input, b"\xD0\xCF\x11\xE0").expect("write");

    cargo_bin_cmd!("phoneclean")
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["detect", input.to_str().expect("path")])
        .assert()
        .code(3);
}

#[test]
fn cli_clean_flags_turn_off_config_defaults() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());
    let config = temp.path().join("phoneclean.toml");
    fs::write(
        &config,
        "[format]\nwhatsapp_format = true\n\n[cleaning]\nmerge_columns = true\n",
    )
    .expect("write config");
    let out = temp.path().join("plain.csv");

    cargo_bin_cmd!("phoneclean")
        .args([
            "--config",
            config.to_str().expect("path"),
            "clean",
            input.to_str().expect("path"),
            "--no-merge",
            "--no-whatsapp",
            "--out",
            out.to_str().expect("path"),
        ])
        .assert()
        .success();

    let written = fs::read_to_string(&out).expect("read output");
    assert!(written.starts_with("Name,Mobile,Alt Phone,Age,Mobile_cleaned,Alt Phone_cleaned\n"));
    assert!(written.contains("Ada,+91 98765 43210,,34,9876543210,\n"));
}

fn write_workbook(dir: &Path) -> PathBuf {
    let parts = [
        (
            "xl/workbook.xml",
            r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Contacts" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
        ),
        (
            "xl/sharedStrings.xml",
            r#"<sst count="5" uniqueCount="5"><si><t>Name</t></si><si><t>Mobile</t></si><si><t>Ada</t></si><si><t>Hedy</t></si><si><t>Katherine</t></si></sst>"#,
        ),
        (
            "xl/worksheets/sheet1.xml",
            r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row><row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>9876543210</v></c></row><row r="3"><c r="A3" t="s"><v>3</v></c><c r="B3"><v>7.0123456789E9</v></c></row><row r="4"><c r="A4" t="s"><v>4</v></c><c r="B4"><v>12345</v></c></row></sheetData></worksheet>"#,
        ),
    ];
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in parts {
        zip.start_file(name, options).expect("start file");
        zip.write_all(body.as_bytes()).expect("write part");
    }
    let bytes = zip.finish().expect("finish").into_inner();
    let path = dir.join("contacts.xlsx");
    fs::write(&path, bytes).expect("write workbook");
    path
}

#[test]
fn cli_completions_skip_config_loading() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.path().join("absent.toml");

    let output = cargo_bin_cmd!("phoneclean")
        .args(["--config", missing.to_str().expect("path"), "completions", "bash"])
        .output()
        .expect("run command");
    assert!(output.status.success());
    let script = String::from_utf8(output.stdout).expect("utf8");
    assert!(script.contains("phoneclean"));
}
