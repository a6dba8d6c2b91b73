//! MIME type to extension lookup backed by `mime_guess`

use super::ExtensionLookup;

/// Picks the first extension `mime_guess` knows for a MIME type
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeExtensionLookup;

impl ExtensionLookup for MimeExtensionLookup {
    fn extension(&self, mime_type: &str) -> Option<String> {
        let essence = mime_type.split(';').next()?.trim();
        if essence.is_empty() {
            return None;
        }
        mime_guess::get_mime_extensions_str(essence)
            .and_then(|exts| exts.first())
            .map(|ext| format!(".{}", ext))
    }
}
