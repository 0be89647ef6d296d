//! End-to-end scan tests driving `run_app` with a text-file sink.

use std::fs;
use std::path::Path;

use clap::Parser;
use psdfonts::cli::Cli;
use psdfonts::error::ExitCode;
use psdfonts::run_app;
use tempfile::tempdir;

use super::fixtures;

fn run(args: &[&str]) -> ExitCode {
    let cli = Cli::try_parse_from(args).expect("valid CLI");
    run_app(cli).expect("run_app")
}

fn write_psd(path: &Path, fonts: &[&str]) {
    fs::write(path, fixtures::psd_with_fonts(&[fonts])).unwrap();
}

fn output_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn scan_records_fonts_to_text_file() {
    let tmp = tempdir().unwrap();
    write_psd(&tmp.path().join("poster.psd"), &["Helvetica", "Garamond"]);
    let out = tmp.path().join("fonts.txt");

    let code = run(&[
        "psdfonts",
        "-q",
        "scan",
        tmp.path().to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);

    assert_eq!(code, ExitCode::Success);
    assert_eq!(output_lines(&out), vec!["Helvetica", "Garamond"]);
}

#[test]
fn rescan_does_not_duplicate_names() {
    let tmp = tempdir().unwrap();
    write_psd(&tmp.path().join("poster.psd"), &["Helvetica"]);
    let out = tmp.path().join("fonts.txt");
    let root = tmp.path().to_str().unwrap().to_string();

    run(&["psdfonts", "-q", "scan", root.as_str(), "--output", out.to_str().unwrap()]);
    let code = run(&["psdfonts", "-q", "scan", root.as_str(), "--output", out.to_str().unwrap()]);

    assert_eq!(code, ExitCode::Success);
    assert_eq!(output_lines(&out), vec!["Helvetica"]);
}

#[test]
fn allow_duplicates_appends_again() {
    let tmp = tempdir().unwrap();
    write_psd(&tmp.path().join("poster.psd"), &["Helvetica"]);
    let out = tmp.path().join("fonts.txt");
    let root = tmp.path().to_str().unwrap().to_string();

    let args = [
        "psdfonts",
        "-q",
        "scan",
        root.as_str(),
        "--output",
        out.to_str().unwrap(),
        "--allow-duplicates",
    ];
    run(&args);
    run(&args);

    assert_eq!(output_lines(&out), vec!["Helvetica", "Helvetica"]);
}

#[test]
fn scan_is_shallow_by_default() {
    let tmp = tempdir().unwrap();
    let nested = tmp.path().join("deep");
    fs::create_dir(&nested).unwrap();
    write_psd(&nested.join("hidden.psd"), &["Zapfino"]);
    let out = tmp.path().join("fonts.txt");

    let code = run(&[
        "psdfonts",
        "-q",
        "scan",
        tmp.path().to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);

    // Note: the output file itself lives in the scanned directory, but it
    // is not a .psd, so only the nested document could have matched.
    assert_eq!(code, ExitCode::NoFonts);
    assert!(output_lines(&out).is_empty());
}

#[test]
fn recursive_scan_descends() {
    let tmp = tempdir().unwrap();
    let nested = tmp.path().join("deep");
    fs::create_dir(&nested).unwrap();
    write_psd(&nested.join("hidden.psd"), &["Zapfino"]);
    let out = tmp.path().join("fonts.txt");

    let code = run(&[
        "psdfonts",
        "-q",
        "scan",
        tmp.path().to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
        "--recursive",
    ]);

    assert_eq!(code, ExitCode::Success);
    assert_eq!(output_lines(&out), vec!["Zapfino"]);
}

#[test]
fn corrupt_document_yields_partial_success() {
    let tmp = tempdir().unwrap();
    write_psd(&tmp.path().join("good.psd"), &["Helvetica"]);
    fs::write(tmp.path().join("bad.psd"), b"this is not a psd").unwrap();
    let out = tmp.path().join("fonts.txt");

    let code = run(&[
        "psdfonts",
        "-q",
        "scan",
        tmp.path().to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);

    // The good document is still recorded.
    assert_eq!(code, ExitCode::PartialSuccess);
    assert_eq!(output_lines(&out), vec!["Helvetica"]);
}

#[test]
fn empty_directory_reports_no_fonts() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("fonts.txt");

    let code = run(&[
        "psdfonts",
        "-q",
        "scan",
        tmp.path().to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);

    assert_eq!(code, ExitCode::NoFonts);
}

#[test]
fn document_without_text_layers_reports_no_fonts() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("flat.psd"), fixtures::empty_psd()).unwrap();
    let out = tmp.path().join("fonts.txt");

    let code = run(&[
        "psdfonts",
        "-q",
        "scan",
        tmp.path().to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);

    assert_eq!(code, ExitCode::NoFonts);
    assert!(output_lines(&out).is_empty());
}
