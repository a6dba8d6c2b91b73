use blossom_drive::config::{ConfigLoader, DriveConfig};
use blossom_drive::DriveError;
use tempfile::TempDir;

fn env_overrides_present() -> bool {
    std::env::vars().any(|(key, _)| key.starts_with("DRIVE_DRIVE__") || key.starts_with("DRIVE_LOGGING__"))
}

#[test]
fn explicit_file_overrides_defaults() {
    if env_overrides_present() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drive.toml");
    std::fs::write(
        &path,
        r#"
[drive]
keep_empty_folders = false
fallback_servers = ["https://mirror.example.com"]

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert!(!config.drive.keep_empty_folders);
    assert_eq!(config.drive.fallback_servers, vec!["https://mirror.example.com"]);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.output, "stderr");
}

#[test]
fn empty_file_yields_defaults() {
    if env_overrides_present() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drive.toml");
    std::fs::write(&path, "").unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.drive, DriveConfig::default().drive);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, DriveError::Config(_)));
}
