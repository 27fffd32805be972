//! MIME type and extension tables.

/// Generic binary type, also used as "unknown".
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Whether a MIME type belongs to the image class.
pub fn is_image(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Look up a MIME type from a file extension.
pub fn mime_for_extension(extension: &str) -> Option<String> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    if extension.is_empty() {
        return None;
    }

    mime_guess::from_ext(&extension)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// Look up the conventional extension for a MIME type.
///
/// Common types use a fixed preference (`image/jpeg` → `jpg`); anything else
/// falls back to the first extension `mime_guess` knows for it.
pub fn extension_for_mime(mime: &str) -> Option<String> {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let preferred = match essence.as_str() {
        // Images
        "image/jpeg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "image/avif" => Some("avif"),
        "image/bmp" => Some("bmp"),
        "image/x-icon" | "image/vnd.microsoft.icon" => Some("ico"),
        "image/tiff" => Some("tiff"),

        // Audio / video
        "audio/mpeg" => Some("mp3"),
        "audio/ogg" => Some("ogg"),
        "audio/wav" | "audio/x-wav" => Some("wav"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),

        // Documents
        "application/pdf" => Some("pdf"),
        "application/zip" => Some("zip"),
        "application/json" => Some("json"),
        "text/plain" => Some("txt"),
        "text/markdown" => Some("md"),
        "text/html" => Some("html"),
        "text/csv" => Some("csv"),

        _ => None,
    };

    if let Some(extension) = preferred {
        return Some(extension.to_string());
    }

    mime_guess::get_mime_extensions_str(&essence)
        .and_then(|extensions| extensions.first())
        .map(|extension| extension.to_string())
}
