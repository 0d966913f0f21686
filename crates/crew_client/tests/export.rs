use std::fs;

use crew_client::{export_records, AtomicFileWriter};
use crew_core::{CanonicalRecord, Interview};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn record() -> CanonicalRecord {
    CanonicalRecord {
        company: "Acme".to_string(),
        position: "CTO".to_string(),
        person_name: "Jane".to_string(),
        articles: vec!["http://x".to_string()],
        interviews: vec![Interview {
            url: "http://y".to_string(),
            title: "T".to_string(),
        }],
    }
}

#[test]
fn export_writes_readable_json_and_creates_dir() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("out");

    let path = export_records(&dir, "records.json", &[record()]).unwrap();
    assert_eq!(path, dir.join("records.json"));

    let written: Vec<CanonicalRecord> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, vec![record()]);
}

#[test]
fn export_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    export_records(temp.path(), "records.json", &[record(), record()]).unwrap();
    let path = export_records(temp.path(), "records.json", &[]).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "[]");
}

#[test]
fn writer_refuses_file_as_directory() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("records.json", "[]").is_err());
    assert!(!file_path.with_file_name("records.json").exists());
}
