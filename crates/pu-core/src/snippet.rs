//! Text inserted at the edit site for uploaded resources.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::resource::Resource;
use crate::settings::SnippetTemplates;

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)\}").ok());

/// Render the snippet for one uploaded resource.
pub fn render_snippet(templates: &SnippetTemplates, resource: &Resource, url: &str) -> String {
    let template = if resource.is_image() {
        &templates.image
    } else {
        &templates.default
    };

    let Some(placeholder) = PLACEHOLDER.as_ref() else {
        return template.clone();
    };

    // One pass, so substituted values are never scanned again.
    placeholder
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "url" => url.to_string(),
            "filename" => resource.file_name(),
            "filenameWithoutExtension" => resource.name.clone(),
            "extension" => resource.extension.clone(),
            "mimeType" => resource.mime.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Join per-resource snippets with a single space, keeping their order.
pub fn join_snippets<I, S>(snippets: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    snippets
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
