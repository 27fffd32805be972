use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// How the MIME type of a captured file is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimeDetection {
    /// Sniff magic bytes, then fall back to extension tables.
    Content,
    /// Extension / MIME tables only.
    Extension,
    /// Keep whatever the data transfer said.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingMethod {
    Hash,
    ShortHash,
    Uuid,
    RandomId,
    UnixTimestamp,
    ReadableTimestamp,
    PromptUser,
}

/// What to do when one paste/drop carries several items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiFilePolicy {
    Allow,
    Deny,
    Prompt,
}

/// Snippet templates.
///
/// Placeholders: `${url}`, `${filename}`, `${filenameWithoutExtension}`,
/// `${extension}`, `${mimeType}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetTemplates {
    pub default: String,
    pub image: String,
}

/// Options that drive one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub enabled: bool,

    /// Total batch size in bytes above which the user is asked. 0 = unlimited.
    pub size_limit: u64,

    pub mime_detection: MimeDetection,
    pub keep_original_filename: bool,
    pub naming_method: NamingMethod,
    pub snippets: SnippetTemplates,
    pub multi_file_policy: MultiFilePolicy,

    /// Case-insensitive regular expression a MIME type must match to be uploaded.
    pub mime_filter: Option<String>,

    /// Skip files that already live inside the workspace.
    pub ignore_workspace_files: bool,
}

/// Per-language overrides; unset fields inherit the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptionsOverride {
    pub enabled: Option<bool>,
    pub size_limit: Option<u64>,
    pub mime_detection: Option<MimeDetection>,
    pub keep_original_filename: Option<bool>,
    pub naming_method: Option<NamingMethod>,
    pub default_snippet: Option<String>,
    pub image_snippet: Option<String>,
    pub multi_file_policy: Option<MultiFilePolicy>,
    pub mime_filter: Option<String>,
    pub ignore_workspace_files: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Settings {
    pub region: String,

    /// Custom endpoint for S3 compatible stores (MinIO, R2, ...).
    pub endpoint: Option<String>,
    pub force_path_style: bool,

    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,

    pub bucket: String,

    /// Prepended verbatim to every object key.
    pub prefix: String,

    /// Base used for the inserted link instead of the bucket URL (CDN, custom domain).
    pub public_url_base: Option<String>,

    /// Upload `name` instead of `name.extension`.
    pub omit_extension: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    /// Directory the files are written to.
    pub target_dir: PathBuf,

    /// Base for the inserted link; a `file://` URI is used when unset.
    pub link_base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UploaderSettings {
    S3(S3Settings),
    Local(LocalSettings),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub pipeline: PipelineOptions,

    /// Keyed by editor language id (`markdown`, `html`, ...).
    #[serde(default)]
    pub languages: HashMap<String, PipelineOptionsOverride>,

    #[serde(default = "default_undo_history_size")]
    pub undo_history_size: usize,

    #[serde(default)]
    pub uploader: UploaderSettings,
}

impl Settings {
    /// Effective options for a document language.
    pub fn options_for(&self, language: Option<&str>) -> PipelineOptions {
        match language.and_then(|id| self.languages.get(id)) {
            Some(overrides) => self.pipeline.clone().merged(overrides),
            None => self.pipeline.clone(),
        }
    }
}

impl PipelineOptions {
    pub fn merged(mut self, o: &PipelineOptionsOverride) -> Self {
        if let Some(v) = o.enabled {
            self.enabled = v;
        }
        if let Some(v) = o.size_limit {
            self.size_limit = v;
        }
        if let Some(v) = o.mime_detection {
            self.mime_detection = v;
        }
        if let Some(v) = o.keep_original_filename {
            self.keep_original_filename = v;
        }
        if let Some(v) = o.naming_method {
            self.naming_method = v;
        }
        if let Some(v) = &o.default_snippet {
            self.snippets.default = v.clone();
        }
        if let Some(v) = &o.image_snippet {
            self.snippets.image = v.clone();
        }
        if let Some(v) = o.multi_file_policy {
            self.multi_file_policy = v;
        }
        if let Some(v) = &o.mime_filter {
            self.mime_filter = Some(v.clone()).filter(|f| !f.is_empty());
        }
        if let Some(v) = o.ignore_workspace_files {
            self.ignore_workspace_files = v;
        }
        self
    }
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

pub(crate) fn default_undo_history_size() -> usize {
    10
}
