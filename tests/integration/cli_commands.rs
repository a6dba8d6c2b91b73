use blossom_drive::config::DriveConfig;
use blossom_drive::tooling::cli::{CliContext, Commands, OutputFormat};
use blossom_drive::remote::{ReadOnlyPublisher, ReadOnlySigner};
use blossom_drive::{Document, Drive, DriveError, EventTemplate};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn write_signed_event(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("event.json");
    let json = serde_json::json!({
        "id": "e1",
        "pubkey": "ab".repeat(32),
        "sig": "00",
        "kind": 30563,
        "created_at": 1_700_000_000u64,
        "content": "",
        "tags": [
            ["d", "music"],
            ["name", "Music"],
            ["description", "Live sets"],
            ["r", "https://cdn.example.com/upload"],
            ["x", "11".repeat(32), "sets/2023/opener.flac", "9000", "audio/flac"],
            ["folder", "sets/2024"]
        ]
    });
    std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();
    path
}

fn cli() -> CliContext {
    CliContext::with_config(DriveConfig::default())
}

#[test]
fn info_json_contract_has_required_fields() {
    let dir = TempDir::new().unwrap();
    let event = write_signed_event(&dir);
    let output = cli()
        .execute(&Commands::Info {
            event,
            format: OutputFormat::Json,
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["identifier"], "music");
    assert_eq!(parsed["name"], "Music");
    assert_eq!(parsed["servers"][0], "https://cdn.example.com/");
    assert_eq!(parsed["pubkey"], "ab".repeat(32));
    assert_eq!(parsed["files"], 1);
    assert_eq!(parsed["folders"], 3);
}

#[test]
fn rm_template_reopens_as_drive() {
    let dir = TempDir::new().unwrap();
    let event = write_signed_event(&dir);
    let output = cli()
        .execute(&Commands::Rm {
            event,
            path: "sets/2023".to_string(),
        })
        .unwrap();

    let template: EventTemplate = serde_json::from_str(&output).unwrap();
    let mut drive = Drive::from_document(
        Document::Template(template),
        Arc::new(ReadOnlySigner),
        Arc::new(ReadOnlyPublisher),
    )
    .unwrap();
    assert_eq!(drive.identifier(), "music");
    assert_eq!(drive.description(), "Live sets");
    assert!(drive.get_folder("sets/2024", false).is_ok());
    assert!(drive.get_path("sets/2023", false).is_err());
}

#[test]
fn download_of_folder_fails() {
    let dir = TempDir::new().unwrap();
    let event = write_signed_event(&dir);
    let err = cli()
        .execute(&Commands::Download {
            event,
            path: "sets/2024".to_string(),
            out: dir.path().join("out.bin"),
            servers: vec![],
        })
        .unwrap_err();
    assert!(matches!(err, DriveError::Tree(_)));
}

#[test]
fn unreadable_document_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = cli()
        .execute(&Commands::Tags { event: path })
        .unwrap_err();
    assert!(matches!(err, DriveError::Json(_)));
}
