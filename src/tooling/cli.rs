//! CLI Tooling
//!
//! Command-line interface over a drive document stored as JSON. Read commands
//! print the drive's state; mutating commands apply one local edit and print
//! the resulting unsigned template, ready for an external signer.

use crate::config::{ConfigLoader, DriveConfig};
use crate::drive::Drive;
use crate::error::DriveError;
use crate::event::Document;
use crate::remote::{ReadOnlyPublisher, ReadOnlySigner};
use crate::tags::create_tags_for_tree;
use crate::tooling::format::{format_drive_info_text, format_listing_text, DriveInfo, EntryRow};
use crate::tree::{BranchKind, DrivePath, FileMetadata};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Drive CLI - inspect and edit content-addressed file drives
#[derive(Parser)]
#[command(name = "drive")]
#[command(about = "Inspect and edit file drives stored as signed documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Output format for read commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show drive metadata
    Info {
        /// Drive document (JSON)
        event: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// List a folder
    Ls {
        event: PathBuf,
        /// Folder path (default: root)
        #[arg(default_value = "/")]
        path: String,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print the tree as flat records
    Tags { event: PathBuf },
    /// Print the blob URL of a file
    Url {
        event: PathBuf,
        path: String,
        /// Extra servers tried after the drive's own
        #[arg(long = "server")]
        servers: Vec<String>,
    },
    /// Download a file from the first server that has it
    Download {
        event: PathBuf,
        path: String,
        /// Destination file
        out: PathBuf,
        #[arg(long = "server")]
        servers: Vec<String>,
    },
    /// Add or overwrite a file entry
    Put {
        event: PathBuf,
        path: String,
        sha256: String,
        size: u64,
        /// MIME type
        #[arg(default_value = "")]
        mime_type: String,
    },
    /// Create a folder
    Mkdir { event: PathBuf, path: String },
    /// Remove a file or folder
    Rm { event: PathBuf, path: String },
    /// Move or rename a file or folder
    Mv {
        event: PathBuf,
        src: String,
        dest: String,
    },
}

/// CLI execution context
pub struct CliContext {
    config: DriveConfig,
}

impl CliContext {
    /// Load configuration, layering `config_path` over the global file when given
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, DriveError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    pub fn with_config(config: DriveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Open a drive document read-only; saving is left to the caller
    pub fn open_drive(&self, event: &Path) -> Result<Drive, DriveError> {
        let raw = std::fs::read_to_string(event)?;
        let document: Document = serde_json::from_str(&raw)?;
        let drive = Drive::from_document(
            document,
            Arc::new(ReadOnlySigner),
            Arc::new(ReadOnlyPublisher),
        )?
        .with_options(self.config.drive.clone());
        Ok(drive)
    }

    /// Execute a command and return its output
    pub fn execute(&self, command: &Commands) -> Result<String, DriveError> {
        match command {
            Commands::Info { event, format } => {
                let drive = self.open_drive(event)?;
                let summary = DriveInfo::from_drive(&drive);
                match format {
                    OutputFormat::Text => Ok(format_drive_info_text(&summary)),
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&summary)?),
                }
            }
            Commands::Ls {
                event,
                path,
                format,
            } => {
                let drive = self.open_drive(event)?;
                let rows = list_folder(&drive, DrivePath::parse(path))?;
                match format {
                    OutputFormat::Text => Ok(format_listing_text(path, &rows)),
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
                }
            }
            Commands::Tags { event } => {
                let drive = self.open_drive(event)?;
                let tags = create_tags_for_tree(drive.tree(), drive.options().keep_empty_folders);
                Ok(serde_json::to_string_pretty(&tags)?)
            }
            Commands::Url {
                event,
                path,
                servers,
            } => {
                let drive = self.open_drive(event)?;
                drive.get_file_url(path.as_str(), servers)
            }
            Commands::Download {
                event,
                path,
                out,
                servers,
            } => {
                let drive = self.open_drive(event)?;
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                let file = runtime
                    .block_on(drive.download_file(path.as_str(), servers))?
                    .ok_or_else(|| {
                        DriveError::Blob(format!("no server returned the blob for {}", path))
                    })?;
                std::fs::write(out, &file.bytes)?;
                info!(path = %path, bytes = file.bytes.len(), "Downloaded file");
                Ok(format!(
                    "Wrote {} ({} bytes, {}) to {}",
                    file.name,
                    file.bytes.len(),
                    if file.mime_type.is_empty() { "unknown type" } else { file.mime_type.as_str() },
                    out.display()
                ))
            }
            Commands::Put {
                event,
                path,
                sha256,
                size,
                mime_type,
            } => self.edit(event, |drive| {
                let metadata = FileMetadata::new(sha256.as_str(), *size, mime_type.as_str());
                drive.set_file(path.as_str(), metadata)?;
                Ok(())
            }),
            Commands::Mkdir { event, path } => self.edit(event, |drive| {
                drive.get_folder(path.as_str(), true)?;
                Ok(())
            }),
            Commands::Rm { event, path } => self.edit(event, |drive| {
                drive.remove(path.as_str())?;
                Ok(())
            }),
            Commands::Mv { event, src, dest } => self.edit(event, |drive| {
                drive.move_node(src.as_str(), dest.as_str())?;
                Ok(())
            }),
        }
    }

    fn edit(
        &self,
        event: &Path,
        op: impl FnOnce(&mut Drive) -> Result<(), DriveError>,
    ) -> Result<String, DriveError> {
        let mut drive = self.open_drive(event)?;
        op(&mut drive)?;
        Ok(serde_json::to_string_pretty(&drive.event_template())?)
    }
}

/// Rows for the direct children of a folder
pub fn list_folder(drive: &Drive, path: DrivePath) -> Result<Vec<EntryRow>, DriveError> {
    let tree = drive.tree();
    let folder = tree.find_folder(path)?;
    let rows = tree
        .children(folder)
        .iter()
        .filter_map(|id| tree.get(*id).map(|branch| (*id, branch)))
        .map(|(id, branch)| match branch.kind() {
            BranchKind::Folder(_) => EntryRow {
                name: branch.name().to_string(),
                path: tree.path(id).to_string(),
                kind: "folder",
                size: None,
                mime_type: None,
                sha256: None,
            },
            BranchKind::File(file) => EntryRow {
                name: branch.name().to_string(),
                path: tree.path(id).to_string(),
                kind: "file",
                size: Some(file.size),
                mime_type: Some(file.mime_type.clone()),
                sha256: Some(file.sha256.clone()),
            },
        })
        .collect();
    Ok(rows)
}
