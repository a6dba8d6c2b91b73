use crate::support::{tag, template, FakeSigner, MapBlobClient, RecordingPublisher};
use blossom_drive::config::DriveOptions;
use blossom_drive::remote::{ReadOnlyPublisher, ReadOnlySigner};
use blossom_drive::{Document, Drive, DriveError, FileMetadata};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn photo() -> FileMetadata {
    FileMetadata::new("ab".repeat(32), 2048, "image/jpeg")
}

fn drive_with(signer: Arc<FakeSigner>, publisher: Arc<RecordingPublisher>) -> Drive {
    let mut drive = Drive::new(signer, publisher);
    drive
        .update(template(
            1_000,
            vec![
                tag(&["d", "photos"]),
                tag(&["name", "Photos"]),
                tag(&["client", "gallery"]),
                tag(&["x", "cd".repeat(32).as_str(), "old.jpg", "10", "image/jpeg"]),
            ],
        ))
        .unwrap();
    drive
}

#[tokio::test]
async fn save_signs_publishes_and_adopts() {
    let signer = Arc::new(FakeSigner::default());
    let publisher = Arc::new(RecordingPublisher::default());
    let mut drive = drive_with(signer.clone(), publisher.clone());

    assert_eq!(drive.save().await.unwrap(), None);
    assert_eq!(signer.calls.load(Ordering::SeqCst), 0);

    drive.set_file("2024/beach.jpg", photo()).unwrap();
    let signed = drive.save().await.unwrap().expect("modified drive saves");

    assert!(!drive.is_modified());
    assert_eq!(publisher.published.lock().unwrap().as_slice(), &[signed.clone()]);
    assert_eq!(drive.document(), Some(&Document::Signed(signed.clone())));
    assert_eq!(drive.pubkey(), Some("f".repeat(64).as_str()));
    assert!(signed.tags.contains(&tag(&["client", "gallery"])));
    assert!(drive.has_hash(&"ab".repeat(32)));
    assert_eq!(drive.name(), "Photos");
}

#[tokio::test]
async fn signer_failure_leaves_drive_modified() {
    let signer = Arc::new(FakeSigner {
        fail: true,
        ..Default::default()
    });
    let publisher = Arc::new(RecordingPublisher::default());
    let mut drive = drive_with(signer, publisher.clone());

    drive.remove("old.jpg").unwrap();
    let err = drive.save().await.unwrap_err();
    assert!(matches!(err, DriveError::Signer(_)));
    assert!(drive.is_modified());
    assert!(drive.get_file("old.jpg").is_err());
    assert_eq!(drive.document().map(Document::created_at), Some(1_000));
    assert!(publisher.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn publisher_failure_leaves_drive_modified() {
    let signer = Arc::new(FakeSigner::default());
    let publisher = Arc::new(RecordingPublisher {
        fail: true,
        ..Default::default()
    });
    let mut drive = drive_with(signer, publisher);

    drive.set_description("summer");
    assert!(matches!(drive.save().await, Err(DriveError::Publisher(_))));
    assert!(drive.is_modified());
    assert_eq!(drive.description(), "summer");
    assert!(matches!(drive.document(), Some(Document::Template(_))));
}

#[tokio::test]
async fn save_without_identifier_is_rejected() {
    let signer = Arc::new(FakeSigner::default());
    let mut drive = Drive::new(signer.clone(), Arc::new(RecordingPublisher::default()));
    drive.set_file("a.txt", FileMetadata::new("aa", 1, "text/plain")).unwrap();
    assert!(matches!(drive.save().await, Err(DriveError::Malformed(_))));
    assert_eq!(signer.calls.load(Ordering::SeqCst), 0);

    drive.set_identifier("notes");
    assert!(drive.save().await.unwrap().is_some());
    assert_eq!(drive.identifier(), "notes");
}

#[test]
fn only_strictly_newer_documents_replace_state() {
    let mut drive = Drive::new(Arc::new(ReadOnlySigner), Arc::new(ReadOnlyPublisher));
    let d1 = template(100, vec![tag(&["d", "x"]), tag(&["x", "aa", "one.txt", "1", ""])]);
    let d2 = template(200, vec![tag(&["d", "x"]), tag(&["x", "bb", "two.txt", "2", ""])]);

    assert!(drive.update(d2.clone()).unwrap());
    assert!(!drive.update(d1).unwrap());
    assert!(drive.get_file("two.txt").is_ok());
    assert!(drive.get_file("one.txt").is_err());
    assert!(!drive.update(d2).unwrap());
}

#[test]
fn newer_document_discards_local_edits() {
    let mut drive = Drive::new(Arc::new(ReadOnlySigner), Arc::new(ReadOnlyPublisher));
    drive.update(template(1, vec![tag(&["d", "x"])])).unwrap();
    drive.set_file("local.txt", FileMetadata::new("aa", 1, "")).unwrap();
    assert!(drive.is_modified());

    drive
        .update(template(2, vec![tag(&["d", "x"]), tag(&["folder", "remote"])]))
        .unwrap();
    assert!(!drive.is_modified());
    assert!(drive.get_file("local.txt").is_err());
    assert!(drive.get_folder("remote", false).is_ok());
}

#[tokio::test]
async fn download_falls_back_across_mirrors() {
    let blobs = Arc::new(MapBlobClient::serving("https://fallback.example.com/", b"jpeg bytes"));
    let mut drive = Drive::new(Arc::new(ReadOnlySigner), Arc::new(ReadOnlyPublisher))
        .with_options(DriveOptions {
            keep_empty_folders: true,
            fallback_servers: vec!["https://fallback.example.com".to_string()],
        })
        .with_blob_client(blobs.clone());
    drive.set_servers(vec!["https://primary.example.com".to_string()]);
    drive.set_file("pics/cat.jpg", photo()).unwrap();

    let file = drive
        .download_file("pics/cat.jpg", &["https://extra.example.com".to_string()])
        .await
        .unwrap()
        .expect("fallback mirror serves the blob");
    assert_eq!(file.name, "cat.jpg");
    assert_eq!(file.mime_type, "image/jpeg");
    assert_eq!(file.bytes, b"jpeg bytes".to_vec());
    assert_eq!(
        blobs.requests.lock().unwrap().as_slice(),
        &[
            "https://primary.example.com/".to_string(),
            "https://extra.example.com/".to_string(),
            "https://fallback.example.com/".to_string(),
        ]
    );
}

#[tokio::test]
async fn download_returns_none_when_every_mirror_fails() {
    let blobs = Arc::new(MapBlobClient::default());
    let mut drive = Drive::new(Arc::new(ReadOnlySigner), Arc::new(ReadOnlyPublisher))
        .with_blob_client(blobs.clone());
    drive.set_servers(vec![
        "https://a.example.com".to_string(),
        "https://b.example.com".to_string(),
    ]);
    drive.set_file("f.bin", FileMetadata::new("ee", 4, "")).unwrap();

    assert_eq!(drive.download_file("f.bin", &[]).await.unwrap(), None);
    assert_eq!(blobs.requests.lock().unwrap().len(), 2);
    assert!(drive.download_file("missing.bin", &[]).await.is_err());
}
