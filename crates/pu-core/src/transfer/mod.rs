//! Platform neutral model of what a paste or drop carries.

mod exclusion;
mod inspect;
mod uri_list;

pub use exclusion::{LocationFilter, NoExclusion, WorkspaceExclusion};
pub use inspect::describe_transfer;
pub use uri_list::parse_uri_list;

use bytes::Bytes;
use url::Url;

/// MIME slot carrying a newline separated list of locations.
pub const URI_LIST_MIME: &str = "text/uri-list";

/// Where the bytes of an attachment can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentContents {
    /// Already in memory (pasted bitmaps, in-memory drags).
    Inline(Bytes),
    /// Must be read from the attachment's origin `uri`.
    AtOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// File name as reported by the host, possibly a path.
    pub name: String,
    /// Where the file came from, when the host knows it.
    pub uri: Option<Url>,
    pub contents: AttachmentContents,
}

impl FileAttachment {
    pub fn inline(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            uri: None,
            contents: AttachmentContents::Inline(data.into()),
        }
    }

    pub fn from_origin(name: impl Into<String>, uri: Url) -> Self {
        Self {
            name: name.into(),
            uri: Some(uri),
            contents: AttachmentContents::AtOrigin,
        }
    }

    pub fn with_uri(mut self, uri: Url) -> Self {
        self.uri = Some(uri);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferItem {
    File(FileAttachment),
    Text(String),
}

impl TransferItem {
    pub fn as_file(&self) -> Option<&FileAttachment> {
        match self {
            TransferItem::File(file) => Some(file),
            TransferItem::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TransferItem::Text(text) => Some(text),
            TransferItem::File(_) => None,
        }
    }
}

/// Ordered `(mime hint, item)` pairs delivered by one paste or drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    items: Vec<(String, TransferItem)>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mime: impl Into<String>, item: TransferItem) {
        self.items.push((mime.into(), item));
    }

    pub fn with_file(mut self, mime: impl Into<String>, file: FileAttachment) -> Self {
        self.push(mime, TransferItem::File(file));
        self
    }

    pub fn with_text(mut self, mime: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(mime, TransferItem::Text(text.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransferItem)> {
        self.items.iter().map(|(mime, item)| (mime.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First item registered under `mime` (case-insensitive).
    pub fn get(&self, mime: &str) -> Option<&TransferItem> {
        self.items
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(mime))
            .map(|(_, item)| item)
    }

    pub fn has_attachments(&self) -> bool {
        self.items.iter().any(|(_, item)| item.as_file().is_some())
    }

    /// The `text/uri-list` slot, if the host filled it.
    pub fn uri_list(&self) -> Option<&str> {
        self.get(URI_LIST_MIME).and_then(TransferItem::as_text)
    }
}
