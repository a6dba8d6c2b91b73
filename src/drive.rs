//! Drive Controller
//!
//! Owns one tree, one metadata record, and the most recently accepted
//! document. Local edits mark the drive modified until the next save or the
//! next accepted document; documents are accepted only when strictly newer
//! than the one held.

use crate::config::DriveOptions;
use crate::error::{DriveError, TreeError};
use crate::event::{Document, EventTemplate, SignedEvent};
use crate::metadata::{self, normalize_servers, DriveMetadata};
use crate::remote::{
    AddressEncoder, BlobClient, ExtensionLookup, HttpBlobClient, MimeExtensionLookup, Publisher,
    Signer,
};
use crate::tags::{create_tree_from_tags, update_tree_in_tags, DecodeMode};
use crate::tree::{extname, Branch, DrivePath, FileMetadata, NodeId, Tree};
use crate::types::{now, DRIVE_KIND};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Notification kinds delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveNotice {
    /// Tree or metadata changed, locally or through a document
    Change,
    /// A newer document was accepted
    Update,
}

/// Handle returned by [`Drive::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&Drive) + Send + Sync>;

/// Bytes fetched for one file, labelled with the tree's name and type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// A file tree kept in sync with a signed drive document
pub struct Drive {
    tree: Tree,
    metadata: DriveMetadata,
    document: Option<Document>,
    modified: bool,
    options: DriveOptions,
    signer: Arc<dyn Signer>,
    publisher: Arc<dyn Publisher>,
    blobs: Arc<dyn BlobClient>,
    extensions: Arc<dyn ExtensionLookup>,
    address_encoder: Option<Arc<dyn AddressEncoder>>,
    listeners: Vec<(SubscriptionId, DriveNotice, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for Drive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drive")
            .field("metadata", &self.metadata)
            .field("created_at", &self.document.as_ref().map(Document::created_at))
            .field("modified", &self.modified)
            .field("nodes", &self.tree.node_count())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Drive {
    /// Create an empty drive with no document
    pub fn new(signer: Arc<dyn Signer>, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            tree: Tree::new(),
            metadata: DriveMetadata::default(),
            document: None,
            modified: false,
            options: DriveOptions::default(),
            signer,
            publisher,
            blobs: Arc::new(HttpBlobClient::new()),
            extensions: Arc::new(MimeExtensionLookup),
            address_encoder: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a drive and ingest its first document
    pub fn from_document(
        document: impl Into<Document>,
        signer: Arc<dyn Signer>,
        publisher: Arc<dyn Publisher>,
    ) -> Result<Self, DriveError> {
        let mut drive = Self::new(signer, publisher);
        drive.update(document)?;
        Ok(drive)
    }

    pub fn with_options(mut self, options: DriveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_blob_client(mut self, blobs: Arc<dyn BlobClient>) -> Self {
        self.blobs = blobs;
        self
    }

    pub fn with_extension_lookup(mut self, extensions: Arc<dyn ExtensionLookup>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_address_encoder(mut self, encoder: Arc<dyn AddressEncoder>) -> Self {
        self.address_encoder = Some(encoder);
        self
    }

    // --- Read accessors ---

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn metadata(&self) -> &DriveMetadata {
        &self.metadata
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn options(&self) -> &DriveOptions {
        &self.options
    }

    /// Whether local edits are waiting to be saved
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn pubkey(&self) -> Option<&str> {
        self.metadata.pubkey.as_deref()
    }

    pub fn identifier(&self) -> &str {
        &self.metadata.identifier
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    pub fn servers(&self) -> &[String] {
        &self.metadata.servers
    }

    /// Human-readable address; needs a document, an owner key, and an encoder
    pub fn address(&self) -> Option<String> {
        let document = self.document.as_ref()?;
        let pubkey = self.metadata.pubkey.as_deref()?;
        let encoder = self.address_encoder.as_ref()?;
        Some(encoder.encode(&self.metadata.identifier, pubkey, document.kind()))
    }

    /// Direct children of the root folder
    pub fn entries(&self) -> impl Iterator<Item = (NodeId, &Branch)> + '_ {
        self.tree
            .children(self.tree.root())
            .iter()
            .filter_map(move |id| self.tree.get(*id).map(|branch| (*id, branch)))
    }

    // --- Metadata setters ---

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.metadata.identifier = identifier.into();
        self.mark_changed();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.metadata.name = name.into();
        self.mark_changed();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.metadata.description = description.into();
        self.mark_changed();
    }

    pub fn set_servers(&mut self, servers: Vec<String>) {
        self.metadata.servers = servers;
        self.mark_changed();
    }

    // --- Subscriptions ---

    /// Register a listener; delivery is synchronous and in registration order
    pub fn subscribe<F>(&mut self, notice: DriveNotice, listener: F) -> SubscriptionId
    where
        F: Fn(&Drive) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, notice, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _, _)| *existing != id);
        self.listeners.len() != before
    }

    fn emit(&self, notice: DriveNotice) {
        for (_, kind, listener) in &self.listeners {
            if *kind == notice {
                listener(self);
            }
        }
    }

    fn mark_changed(&mut self) {
        self.modified = true;
        self.emit(DriveNotice::Change);
    }

    /// Run a tree operation, marking the drive modified if it changed anything
    fn track<T>(
        &mut self,
        op: impl FnOnce(&mut Tree) -> Result<T, TreeError>,
    ) -> Result<T, TreeError> {
        let revision = self.tree.revision();
        let result = op(&mut self.tree)?;
        if self.tree.revision() != revision {
            self.mark_changed();
        }
        Ok(result)
    }

    // --- Document synchronization ---

    /// Ingest a document.
    ///
    /// Returns `Ok(false)` without touching state when a document with an
    /// equal or newer timestamp is already held. A document without an
    /// identifier is rejected and leaves the drive unchanged.
    pub fn update(&mut self, document: impl Into<Document>) -> Result<bool, DriveError> {
        let document = document.into();
        if let Some(held) = &self.document {
            if document.created_at() <= held.created_at() {
                debug!(
                    held = held.created_at(),
                    incoming = document.created_at(),
                    "Ignoring stale drive document"
                );
                return Ok(false);
            }
        }
        self.accept(document)?;
        Ok(true)
    }

    fn accept(&mut self, document: Document) -> Result<(), DriveError> {
        let (metadata, tree) = Self::parse(&document, &self.metadata.identifier)?;
        debug!(
            identifier = %metadata.identifier,
            created_at = document.created_at(),
            nodes = tree.node_count(),
            "Accepted drive document"
        );
        self.metadata = metadata;
        self.tree = tree;
        self.document = Some(document);
        self.modified = false;
        self.emit(DriveNotice::Change);
        self.emit(DriveNotice::Update);
        Ok(())
    }

    fn parse(
        document: &Document,
        held_identifier: &str,
    ) -> Result<(DriveMetadata, Tree), DriveError> {
        let mut metadata = metadata::read_document(document, held_identifier)?;
        let tree = create_tree_from_tags(&metadata.tree_tags, DecodeMode::Lenient)?;
        metadata.tree_tags.clear();
        Ok((metadata, tree))
    }

    /// Discard local edits and rebuild from the held document.
    ///
    /// Without a held document the drive returns to its empty state.
    pub fn reset(&mut self) -> Result<(), DriveError> {
        if !self.modified {
            return Ok(());
        }
        let (metadata, tree) = match &self.document {
            Some(document) => Self::parse(document, &self.metadata.identifier)?,
            None => (DriveMetadata::default(), Tree::new()),
        };
        self.metadata = metadata;
        self.tree = tree;
        self.modified = false;
        self.emit(DriveNotice::Change);
        Ok(())
    }

    /// Build the outbound template from the current tree and metadata
    pub fn event_template(&self) -> EventTemplate {
        let held_tags = self
            .document
            .as_ref()
            .map(|document| document.tags().to_vec())
            .unwrap_or_default();
        let passengers_and_tree =
            update_tree_in_tags(&held_tags, &self.tree, self.options.keep_empty_folders);

        let mut tags = metadata::metadata_tags(&self.metadata);
        tags.extend(
            passengers_and_tree
                .into_iter()
                .filter(|tag| !metadata::is_metadata_tag(tag)),
        );

        EventTemplate {
            kind: DRIVE_KIND,
            content: self
                .document
                .as_ref()
                .map(|document| document.content().to_string())
                .unwrap_or_default(),
            created_at: now(),
            tags,
        }
    }

    /// Sign, publish, and adopt the current state.
    ///
    /// No-op when nothing changed. Signing or publishing failures leave the
    /// drive untouched. The signed result replaces the held document
    /// unconditionally.
    pub async fn save(&mut self) -> Result<Option<SignedEvent>, DriveError> {
        if !self.modified {
            return Ok(None);
        }
        if self.metadata.identifier.is_empty() {
            return Err(DriveError::Malformed("drive has no identifier".to_string()));
        }
        let template = self.event_template();
        let signed = self.signer.sign(template).await?;
        self.publisher.publish(&signed).await?;
        self.accept(Document::Signed(signed.clone()))?;
        info!(
            identifier = %self.metadata.identifier,
            created_at = signed.created_at,
            "Saved drive"
        );
        Ok(Some(signed))
    }

    // --- Tree navigation and mutation ---

    pub fn get_path(&mut self, path: impl Into<DrivePath>, create: bool) -> Result<NodeId, TreeError> {
        let path = path.into();
        if create {
            self.track(|tree| tree.get_path(path, true))
        } else {
            self.tree.find_path(path)
        }
    }

    pub fn get_folder(&mut self, path: impl Into<DrivePath>, create: bool) -> Result<NodeId, TreeError> {
        let path = path.into();
        if create {
            self.track(|tree| tree.get_folder(path, true))
        } else {
            self.tree.find_folder(path)
        }
    }

    pub fn get_file(&self, path: impl Into<DrivePath>) -> Result<&FileMetadata, TreeError> {
        self.tree.get_file(path)
    }

    pub fn set_file(
        &mut self,
        path: impl Into<DrivePath>,
        metadata: FileMetadata,
    ) -> Result<NodeId, TreeError> {
        let path = path.into();
        self.track(|tree| tree.set_file(path, metadata))
    }

    pub fn remove(&mut self, path: impl Into<DrivePath>) -> Result<(), TreeError> {
        let path = path.into();
        self.track(|tree| tree.remove(path))
    }

    pub fn move_node(
        &mut self,
        src: impl Into<DrivePath>,
        dest: impl Into<DrivePath>,
    ) -> Result<NodeId, TreeError> {
        let (src, dest) = (src.into(), dest.into());
        self.track(|tree| tree.move_node(src, dest))
    }

    /// Full depth-first scan for a file with the given content hash
    pub fn has_hash(&self, sha256: &str) -> bool {
        let tree = &self.tree;
        tree.descendants(tree.root())
            .into_iter()
            .filter_map(|id| tree.get(id).and_then(Branch::as_file))
            .any(|file| file.sha256 == sha256)
    }

    // --- Blob access ---

    /// Drive servers, then extra servers, then configured fallbacks, deduplicated
    pub fn candidate_servers(&self, extra: &[String]) -> Vec<String> {
        normalize_servers(
            self.metadata
                .servers
                .iter()
                .chain(extra.iter())
                .chain(self.options.fallback_servers.iter()),
        )
    }

    fn resolve_file(&self, path: DrivePath) -> Result<(String, FileMetadata), TreeError> {
        let id = self.tree.find_path(&path)?;
        let branch = self
            .tree
            .get(id)
            .ok_or_else(|| TreeError::NotFound(path.to_string()))?;
        let file = branch
            .as_file()
            .ok_or_else(|| TreeError::NotAFile(path.to_string()))?;
        Ok((branch.name().to_string(), file.clone()))
    }

    /// Content-addressed URL of a file on the first candidate server
    pub fn get_file_url(
        &self,
        path: impl Into<DrivePath>,
        extra_servers: &[String],
    ) -> Result<String, DriveError> {
        let (name, file) = self.resolve_file(path.into())?;
        let server = self
            .candidate_servers(extra_servers)
            .into_iter()
            .next()
            .ok_or(DriveError::NoServers)?;
        let ext = extname(&name)
            .map(str::to_string)
            .or_else(|| self.extensions.extension(&file.mime_type))
            .unwrap_or_default();
        let url = url::Url::parse(&server)?.join(&format!("/{}{}", file.sha256, ext))?;
        Ok(url.to_string())
    }

    /// Try each candidate server in order; `None` when all of them fail
    pub async fn download_file(
        &self,
        path: impl Into<DrivePath>,
        extra_servers: &[String],
    ) -> Result<Option<DownloadedFile>, DriveError> {
        let (name, file) = self.resolve_file(path.into())?;
        for server in self.candidate_servers(extra_servers) {
            match self.blobs.get_blob(&server, &file.sha256).await {
                Ok(bytes) => {
                    return Ok(Some(DownloadedFile {
                        name,
                        mime_type: file.mime_type,
                        bytes,
                    }))
                }
                Err(err) => debug!(server = %server, sha256 = %file.sha256, error = %err, "Mirror failed"),
            }
        }
        Ok(None)
    }
}
