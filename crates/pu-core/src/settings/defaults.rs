use std::collections::HashMap;
use std::path::PathBuf;

use super::model::*;

impl Default for SnippetTemplates {
    fn default() -> Self {
        Self {
            default: "[${filename}](${url})".to_string(),
            image: "![${filenameWithoutExtension}](${url})".to_string(),
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            size_limit: 10 * 1024 * 1024, // 10 MiB
            mime_detection: MimeDetection::Content,
            keep_original_filename: false,
            naming_method: NamingMethod::ShortHash,
            snippets: SnippetTemplates::default(),
            multi_file_policy: MultiFilePolicy::Prompt,
            mime_filter: None,
            ignore_workspace_files: true,
        }
    }
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            force_path_style: false,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: None,
            bucket: String::new(),
            prefix: String::new(),
            public_url_base: None,
            omit_extension: false,
        }
    }
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::new(),
            link_base: None,
        }
    }
}

impl Default for UploaderSettings {
    fn default() -> Self {
        UploaderSettings::S3(S3Settings::default())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            pipeline: PipelineOptions::default(),
            languages: HashMap::new(),
            undo_history_size: default_undo_history_size(),
            uploader: UploaderSettings::default(),
        }
    }
}
