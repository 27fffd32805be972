//! Command line arguments as a drop payload.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use pu_core::transfer::URI_LIST_MIME;
use pu_core::DataTransfer;
use url::Url;

/// One `text/uri-list` entry per argument, the way a file manager drop looks.
///
/// Arguments with a URL scheme are taken verbatim; anything else is a path,
/// resolved against the current directory.
pub fn drop_payload<S: AsRef<str>>(items: &[S]) -> Result<DataTransfer> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        lines.push(location(item.as_ref())?.to_string());
    }
    Ok(DataTransfer::new().with_text(URI_LIST_MIME, lines.join("\r\n")))
}

fn location(item: &str) -> Result<Url> {
    let item = item.trim();
    if let Ok(url) = Url::parse(item) {
        // Single letter schemes are Windows drive letters.
        if url.scheme().len() > 1 {
            return Ok(url);
        }
    }

    let path = Path::new(item);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot resolve the current directory")?
            .join(path)
    };
    Url::from_file_path(&absolute).map_err(|()| anyhow!("not a usable path: {item}"))
}
