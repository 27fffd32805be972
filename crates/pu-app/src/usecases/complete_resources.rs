use std::collections::HashSet;
use std::sync::Arc;

use pu_core::naming::{generate_name, GeneratedName};
use pu_core::ports::{ClockPort, UserInteractionPort};
use pu_core::resource::{resolve_type, PLACEHOLDER_IMAGE_NAME};
use pu_core::{IncompleteResource, NamingMethod, PipelineOptions, Resource};
use tracing::{debug, info, warn};

/// Turns captured items into fully specified resources.
pub struct CompleteResources {
    ui: Arc<dyn UserInteractionPort>,
    clock: Arc<dyn ClockPort>,
}

impl CompleteResources {
    pub fn new(ui: Arc<dyn UserInteractionPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { ui, clock }
    }

    /// Names, types and deduplicates a batch.
    ///
    /// Items whose naming yields an empty name (for example a dismissed
    /// prompt) are dropped. Order is preserved.
    #[tracing::instrument(
        name = "usecase.complete_resources.execute",
        skip_all,
        fields(count = batch.len(), naming = ?options.naming_method)
    )]
    pub async fn execute(
        &self,
        batch: Vec<IncompleteResource>,
        options: &PipelineOptions,
    ) -> Vec<Resource> {
        let mut completed = Vec::with_capacity(batch.len());

        for mut resource in batch {
            if needs_generated_name(&resource, options.keep_original_filename) {
                match self.name_for(options.naming_method, &resource).await {
                    Some(name) => resource.name = Some(name),
                    None => {
                        info!("naming produced no usable name, dropping resource");
                        continue;
                    }
                }
            }

            let (mime, extension) = self.resolve(&resource, options).await;
            let name = resource
                .name
                .map(|name| name.trim().to_string())
                .unwrap_or_default();
            debug!(%name, %mime, %extension, "resource completed");

            completed.push(Resource {
                mime,
                name,
                extension,
                data: resource.data,
            });
        }

        dedupe_names(&mut completed);
        completed
    }

    async fn name_for(&self, method: NamingMethod, resource: &IncompleteResource) -> Option<String> {
        let name = match generate_name(method, resource, self.clock.now_ms()) {
            GeneratedName::Ready(name) => name,
            GeneratedName::AskUser { suggestion } => self
                .ui
                .input("File name for the upload", suggestion.as_deref())
                .await
                .unwrap_or_default(),
        };

        let name = single_segment(name.trim());
        (!name.is_empty()).then_some(name)
    }

    /// Content sniffing is CPU bound, so it runs on the blocking pool.
    async fn resolve(&self, resource: &IncompleteResource, options: &PipelineOptions) -> (String, String) {
        let detection = options.mime_detection;
        let snapshot = resource.clone();

        match tokio::task::spawn_blocking(move || resolve_type(&snapshot, detection)).await {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(error = %err, "type detection task failed, resolving inline");
                resolve_type(resource, detection)
            }
        }
    }
}

fn needs_generated_name(resource: &IncompleteResource, keep_original: bool) -> bool {
    match resource.name.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(PLACEHOLDER_IMAGE_NAME) => true,
        Some(_) => !keep_original,
    }
}

/// A name must stay one path segment: separators become `-`, dot segments are empty.
fn single_segment(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    match name.as_str() {
        "." | ".." => String::new(),
        _ => name,
    }
}

/// Make names unique within a batch: `shot`, `shot.1`, `shot.2`, ...
///
/// The first occurrence keeps the bare name.
pub fn dedupe_names(batch: &mut [Resource]) {
    let mut seen: HashSet<String> = HashSet::with_capacity(batch.len());

    for resource in batch.iter_mut() {
        if seen.contains(&resource.name) {
            let mut suffix = 1usize;
            let mut candidate = format!("{}.{}", resource.name, suffix);
            while seen.contains(&candidate) {
                suffix += 1;
                candidate = format!("{}.{}", resource.name, suffix);
            }
            resource.name = candidate;
        }
        seen.insert(resource.name.clone());
    }
}
