//! Format drive metadata and folder listings as text.

use crate::drive::Drive;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// One row of a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub name: String,
    pub path: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Drive summary for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct DriveInfo {
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub servers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,
    pub files: usize,
    pub folders: usize,
}

impl DriveInfo {
    pub fn from_drive(drive: &Drive) -> Self {
        let tree = drive.tree();
        let nodes = tree.descendants(tree.root());
        let files = nodes
            .iter()
            .filter(|id| tree.get(**id).map(|b| !b.is_folder()).unwrap_or(false))
            .count();
        Self {
            identifier: drive.identifier().to_string(),
            name: drive.name().to_string(),
            description: drive.description().to_string(),
            servers: drive.servers().to_vec(),
            pubkey: drive.pubkey().map(str::to_string),
            created_at: drive.document().map(|d| d.created_at()),
            files,
            folders: nodes.len() - files,
        }
    }
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn short_hash(sha256: &str) -> &str {
    &sha256[..sha256.len().min(12)]
}

/// Format drive metadata as human-readable text.
pub fn format_drive_info_text(info: &DriveInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Drive")));
    out.push_str(&format!("  Identifier: {}\n", info.identifier));
    out.push_str(&format!("  Name: {}\n", info.name));
    if !info.description.is_empty() {
        out.push_str(&format!("  Description: {}\n", info.description));
    }
    if let Some(ref pubkey) = info.pubkey {
        out.push_str(&format!("  Owner: {}\n", pubkey));
    }
    if let Some(created_at) = info.created_at {
        let stamp = chrono::DateTime::from_timestamp(created_at as i64, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| created_at.to_string());
        out.push_str(&format!("  Updated: {}\n", stamp));
    }
    out.push_str(&format!("  Files: {}  Folders: {}\n\n", info.files, info.folders));

    out.push_str(&format!("{}\n\n", format_section_heading("Servers")));
    if info.servers.is_empty() {
        out.push_str("  (none)\n");
    }
    for server in &info.servers {
        out.push_str(&format!("  {}\n", server));
    }
    out
}

/// Format a folder listing as a table.
pub fn format_listing_text(path: &str, rows: &[EntryRow]) -> String {
    let mut out = format!("{}\n\n", format_section_heading(path));
    if rows.is_empty() {
        out.push_str("  (empty)\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Kind", "Size", "Type", "Hash"]);
    for row in rows {
        table.add_row(vec![
            row.name.clone(),
            row.kind.to_string(),
            row.size.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
            row.mime_type.clone().unwrap_or_default(),
            row.sha256.as_deref().map(short_hash).unwrap_or("").to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}
