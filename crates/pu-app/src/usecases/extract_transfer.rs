use std::sync::Arc;

use pu_core::ports::{FileKind, FileSystemPort};
use pu_core::resource::split_file_name;
use pu_core::transfer::{
    describe_transfer, parse_uri_list, AttachmentContents, LocationFilter,
};
use pu_core::{DataTransfer, IncompleteResource};
use tracing::{debug, info, warn};
use url::Url;

/// Reads a data transfer into incomplete resources.
///
/// Attachments win over the `text/uri-list` slot. Unreadable or excluded items
/// are skipped; this use case never fails as a whole.
pub struct ExtractTransfer {
    file_system: Arc<dyn FileSystemPort>,
}

impl ExtractTransfer {
    pub fn new(file_system: Arc<dyn FileSystemPort>) -> Self {
        Self { file_system }
    }

    #[tracing::instrument(
        name = "usecase.extract_transfer.execute",
        skip_all,
        fields(items = transfer.len())
    )]
    pub async fn execute(
        &self,
        transfer: &DataTransfer,
        exclude: &dyn LocationFilter,
    ) -> Vec<IncompleteResource> {
        for line in describe_transfer(transfer) {
            debug!("{line}");
        }

        let resources = if transfer.has_attachments() {
            self.from_attachments(transfer, exclude).await
        } else {
            self.from_uri_list(transfer, exclude).await
        };

        info!(count = resources.len(), "extracted resources from data transfer");
        resources
    }

    async fn from_attachments(
        &self,
        transfer: &DataTransfer,
        exclude: &dyn LocationFilter,
    ) -> Vec<IncompleteResource> {
        let mut resources = Vec::new();

        for (mime, item) in transfer.iter() {
            let Some(file) = item.as_file() else {
                continue;
            };

            if let Some(uri) = &file.uri {
                if exclude.excludes(uri) {
                    debug!(%uri, "skipping excluded attachment");
                    continue;
                }
            }

            let data = match (&file.contents, &file.uri) {
                (AttachmentContents::Inline(data), _) => data.clone(),
                (AttachmentContents::AtOrigin, Some(uri)) => match self.file_system.read(uri).await
                {
                    Ok(data) => data,
                    Err(err) => {
                        warn!(%uri, error = %err, "failed to read attachment, skipping");
                        continue;
                    }
                },
                (AttachmentContents::AtOrigin, None) => {
                    warn!(name = %file.name, "attachment has neither data nor origin, skipping");
                    continue;
                }
            };

            resources.push(
                IncompleteResource::new(data)
                    .with_file_name(&file.name)
                    .with_mime(mime),
            );
        }

        resources
    }

    async fn from_uri_list(
        &self,
        transfer: &DataTransfer,
        exclude: &dyn LocationFilter,
    ) -> Vec<IncompleteResource> {
        let Some(list) = transfer.uri_list() else {
            debug!("data transfer has neither attachments nor a uri list");
            return Vec::new();
        };

        let mut resources = Vec::new();
        for uri in parse_uri_list(list) {
            if exclude.excludes(&uri) {
                debug!(%uri, "skipping excluded location");
                continue;
            }

            match self.file_system.stat(&uri).await {
                Ok(stat) if stat.kind == FileKind::File => {}
                Ok(stat) => {
                    warn!(%uri, kind = ?stat.kind, "location is not a regular file, skipping");
                    continue;
                }
                Err(err) => {
                    warn!(%uri, error = %err, "location is unreachable, skipping");
                    continue;
                }
            }

            match self.file_system.read(&uri).await {
                Ok(data) => {
                    let mut resource = IncompleteResource::new(data);
                    let (name, extension) = split_file_name(&location_path(&uri));
                    resource.name = Some(name).filter(|n| !n.is_empty());
                    resource.extension = extension;
                    resources.push(resource);
                }
                Err(err) => warn!(%uri, error = %err, "failed to read location, skipping"),
            }
        }

        resources
    }
}

/// Decoded path of a location, used to derive its file name.
fn location_path(uri: &Url) -> String {
    if uri.scheme() == "file" {
        if let Ok(path) = uri.to_file_path() {
            return path.to_string_lossy().into_owned();
        }
    }
    uri.path().to_string()
}
