//! End-to-end scan tests with the SQLite sink, covering the
//! skip-if-already-recorded behavior across runs.

use std::fs;
use std::path::Path;

use clap::Parser;
use filetime::FileTime;
use psdfonts::cli::Cli;
use psdfonts::error::ExitCode;
use psdfonts::run_app;
use psdfonts::store::Database;
use tempfile::tempdir;

use super::fixtures;

fn run(args: &[&str]) -> ExitCode {
    let cli = Cli::try_parse_from(args).expect("valid CLI");
    run_app(cli).expect("run_app")
}

fn write_psd(path: &Path, fonts: &[&str]) {
    fs::write(path, fixtures::psd_with_fonts(&[fonts])).unwrap();
}

#[test]
fn scan_records_files_fonts_and_associations() {
    let tmp = tempdir().unwrap();
    write_psd(&tmp.path().join("poster.psd"), &["Helvetica", "Garamond"]);
    write_psd(&tmp.path().join("flyer.psd"), &["Helvetica"]);
    let db_path = tmp.path().join("fonts.db");

    let code = run(&[
        "psdfonts",
        "-q",
        "scan",
        tmp.path().to_str().unwrap(),
        "--database",
        db_path.to_str().unwrap(),
    ]);
    assert_eq!(code, ExitCode::Success);

    let db = Database::open(&db_path).unwrap();
    let fonts = db.fonts_with_files().unwrap();
    let names: Vec<_> = fonts.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Garamond", "Helvetica"]);

    let helvetica = fonts.iter().find(|f| f.name == "Helvetica").unwrap();
    assert_eq!(helvetica.files.as_deref().unwrap().len(), 2);

    let files = db.files().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.modified_at.is_some()));
}

#[test]
fn second_run_skips_recorded_files() {
    let tmp = tempdir().unwrap();
    let doc = tmp.path().join("poster.psd");
    write_psd(&doc, &["Helvetica"]);
    let db_path = tmp.path().join("fonts.db");
    let root = tmp.path().to_str().unwrap().to_string();

    run(&["psdfonts", "-q", "scan", root.as_str(), "--database", db_path.to_str().unwrap()]);

    // Replace the document with one naming a different font. Without
    // --allow-duplicates the file is skipped, so the new font must not
    // appear.
    fs::write(&doc, fixtures::psd_with_fonts(&[&["Zapfino"]])).unwrap();
    let code = run(&["psdfonts", "-q", "scan", root.as_str(), "--database", db_path.to_str().unwrap()]);
    assert_eq!(code, ExitCode::Success);

    let db = Database::open(&db_path).unwrap();
    let names: Vec<_> = db.fonts().unwrap().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Helvetica"]);
}

#[test]
fn allow_duplicates_reprocesses_files() {
    let tmp = tempdir().unwrap();
    let doc = tmp.path().join("poster.psd");
    write_psd(&doc, &["Helvetica"]);
    let db_path = tmp.path().join("fonts.db");
    let root = tmp.path().to_str().unwrap().to_string();

    run(&["psdfonts", "-q", "scan", root.as_str(), "--database", db_path.to_str().unwrap()]);

    fs::write(&doc, fixtures::psd_with_fonts(&[&["Zapfino"]])).unwrap();
    let code = run(&[
        "psdfonts",
        "-q",
        "scan",
        root.as_str(),
        "--database",
        db_path.to_str().unwrap(),
        "--allow-duplicates",
    ]);
    assert_eq!(code, ExitCode::Success);

    let db = Database::open(&db_path).unwrap();
    let names: Vec<_> = db.fonts().unwrap().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Helvetica", "Zapfino"]);

    // Still a single file row; the upsert refreshed it.
    assert_eq!(db.files().unwrap().len(), 1);
}

#[test]
fn reprocessing_refreshes_timestamps() {
    let tmp = tempdir().unwrap();
    let doc = tmp.path().join("poster.psd");
    write_psd(&doc, &["Helvetica"]);
    let db_path = tmp.path().join("fonts.db");
    let root = tmp.path().to_str().unwrap().to_string();

    // Pin an old mtime, record it, then bump the mtime and re-process.
    filetime::set_file_mtime(&doc, FileTime::from_unix_time(1_000_000_000, 0)).unwrap();
    run(&["psdfonts", "-q", "scan", root.as_str(), "--database", db_path.to_str().unwrap()]);

    let db = Database::open(&db_path).unwrap();
    let before = db.files().unwrap()[0].modified_at.clone();
    drop(db);

    filetime::set_file_mtime(&doc, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();
    run(&[
        "psdfonts",
        "-q",
        "scan",
        root.as_str(),
        "--database",
        db_path.to_str().unwrap(),
        "--allow-duplicates",
    ]);

    let db = Database::open(&db_path).unwrap();
    let after = db.files().unwrap()[0].modified_at.clone();
    assert_ne!(before, after);
}

#[test]
fn mixed_good_and_bad_documents_record_the_good_one() {
    let tmp = tempdir().unwrap();
    write_psd(&tmp.path().join("good.psd"), &["Helvetica"]);
    fs::write(tmp.path().join("bad.psb"), b"8BPSgarbage").unwrap();
    let db_path = tmp.path().join("fonts.db");

    let code = run(&[
        "psdfonts",
        "-q",
        "scan",
        tmp.path().to_str().unwrap(),
        "--database",
        db_path.to_str().unwrap(),
    ]);
    assert_eq!(code, ExitCode::PartialSuccess);

    let db = Database::open(&db_path).unwrap();
    assert_eq!(db.files().unwrap().len(), 1);
    let names: Vec<_> = db.fonts().unwrap().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Helvetica"]);
}
