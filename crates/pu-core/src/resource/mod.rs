//! Captured files before and after normalization.

mod mime;
mod type_resolver;

pub use mime::{extension_for_mime, is_image, mime_for_extension, OCTET_STREAM};
pub use type_resolver::resolve_type;

use bytes::Bytes;

/// Placeholder name some editors give to pasted bitmaps.
pub const PLACEHOLDER_IMAGE_NAME: &str = "image";

/// A captured file whose name and type may still be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncompleteResource {
    pub mime: Option<String>,
    pub name: Option<String>,
    pub extension: Option<String>,
    pub data: Bytes,
}

impl IncompleteResource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }

    /// Sets `name` and `extension` from a file name or path.
    pub fn with_file_name(mut self, file_name: &str) -> Self {
        let (name, extension) = split_file_name(file_name);
        self.name = Some(name).filter(|n| !n.is_empty());
        self.extension = extension;
        self
    }

    /// Records a MIME hint; empty hints are ignored.
    pub fn with_mime(mut self, mime: &str) -> Self {
        let mime = mime.trim();
        self.mime = (!mime.is_empty()).then(|| mime.to_string());
        self
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A fully specified resource, ready for upload.
///
/// `mime` is never empty and `name` is unique within its batch.
/// `extension` may be empty when no extension could be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub mime: String,
    pub name: String,
    pub extension: String,
    pub data: Bytes,
}

impl Resource {
    /// `name.extension`, or just `name` when the extension is empty.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_image(&self) -> bool {
        is_image(&self.mime)
    }
}

/// Splits a path into `(name, extension)`.
///
/// The last `/` or `\` separates the directory; the last `.` of the remaining
/// file name separates the extension. A leading dot (`.env`) is part of the name.
pub fn split_file_name(path: &str) -> (String, Option<String>) {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);

    match file_name.rfind('.') {
        Some(idx) if idx > 0 => {
            let extension = &file_name[idx + 1..];
            (
                file_name[..idx].to_string(),
                (!extension.is_empty()).then(|| extension.to_string()),
            )
        }
        _ => (file_name.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_file_name_uses_last_separator_and_last_dot() {
        assert_eq!(
            split_file_name("/home/me/shots/photo.final.png"),
            ("photo.final".to_string(), Some("png".to_string()))
        );
        assert_eq!(
            split_file_name(r"C:\Users\me\report.pdf"),
            ("report".to_string(), Some("pdf".to_string()))
        );
    }

    #[test]
    fn split_file_name_without_extension() {
        assert_eq!(split_file_name("Makefile"), ("Makefile".to_string(), None));
        assert_eq!(split_file_name("dir/.env"), (".env".to_string(), None));
        assert_eq!(split_file_name("trailing."), ("trailing".to_string(), None));
    }

    #[test]
    fn with_mime_ignores_empty_hint() {
        let resource = IncompleteResource::new(vec![1u8]).with_mime("  ");
        assert_eq!(resource.mime, None);

        let resource = IncompleteResource::new(vec![1u8]).with_mime("image/png");
        assert_eq!(resource.mime.as_deref(), Some("image/png"));
    }

    #[test]
    fn file_name_skips_empty_extension() {
        let resource = Resource {
            mime: OCTET_STREAM.to_string(),
            name: "blob".to_string(),
            extension: String::new(),
            data: Bytes::new(),
        };
        assert_eq!(resource.file_name(), "blob");

        let resource = Resource {
            extension: "bin".to_string(),
            ..resource
        };
        assert_eq!(resource.file_name(), "blob.bin");
    }
}
