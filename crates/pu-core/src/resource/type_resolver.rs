use super::mime::{extension_for_mime, mime_for_extension, OCTET_STREAM};
use super::IncompleteResource;
use crate::settings::MimeDetection;

/// Resolve the final `(mime, extension)` pair of a captured resource.
///
/// Each step only fills fields that are still empty:
/// 1. a generic binary MIME counts as empty;
/// 2. `Content` sniffs the magic bytes and sets both fields on a match;
/// 3. unless detection is `None`, the extension table fills the MIME
///    (miss → binary) or the MIME table fills the extension (miss → empty);
/// 4. leftovers become `application/octet-stream` and `""`.
///
/// Sniffing is CPU bound; callers on an async runtime should run this on a
/// blocking thread for large payloads.
pub fn resolve_type(resource: &IncompleteResource, detection: MimeDetection) -> (String, String) {
    let mut mime = resource
        .mime
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case(OCTET_STREAM))
        .map(str::to_string);
    let mut extension = resource
        .extension
        .as_deref()
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .map(str::to_string);

    if mime.is_none() && detection == MimeDetection::Content {
        if let Some(kind) = infer::get(&resource.data) {
            mime = Some(kind.mime_type().to_string());
            extension = Some(kind.extension().to_string());
        }
    }

    if detection != MimeDetection::None {
        match (&mime, &extension) {
            (None, Some(ext)) => {
                mime = Some(mime_for_extension(ext).unwrap_or_else(|| OCTET_STREAM.to_string()));
            }
            (Some(m), None) => {
                extension = Some(extension_for_mime(m).unwrap_or_default());
            }
            _ => {}
        }
    }

    (
        mime.unwrap_or_else(|| OCTET_STREAM.to_string()),
        extension.unwrap_or_default(),
    )
}
