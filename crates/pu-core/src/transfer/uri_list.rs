use std::path::Path;

use url::Url;

/// Parse a `text/uri-list` payload.
///
/// One location per line; blank lines and `#` comments are skipped. Lines that
/// are not URIs but absolute paths are accepted as `file://` locations, which
/// is what terminals and some file managers put on the clipboard.
pub fn parse_uri_list(text: &str) -> Vec<Url> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match Url::parse(line) {
            Ok(url) if url.scheme().len() > 1 => Some(url),
            _ => {
                let url = Url::from_file_path(Path::new(line)).ok();
                if url.is_none() {
                    tracing::warn!(line, "skipping malformed uri-list entry");
                }
                url
            }
        })
        .collect()
}
