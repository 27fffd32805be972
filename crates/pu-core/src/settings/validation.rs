use super::model::{LocalSettings, S3Settings, UploaderSettings};

/// Configuration that cannot be used to reach a backend.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required uploader setting: {0}")]
    MissingParameter(&'static str),

    #[error("invalid uploader setting {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl S3Settings {
    /// Checks the parameters needed before any request is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("region", &self.region)?;
        require("bucket", &self.bucket)?;
        require("access_key_id", &self.access_key_id)?;
        require("secret_access_key", &self.secret_access_key)?;

        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::InvalidParameter {
                    name: "endpoint",
                    reason: format!("expected an http(s) URL, got `{endpoint}`"),
                });
            }
        }
        Ok(())
    }
}

impl LocalSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingParameter("target_dir"));
        }
        Ok(())
    }
}

impl UploaderSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            UploaderSettings::S3(s3) => s3.validate(),
            UploaderSettings::Local(local) => local.validate(),
        }
    }
}

fn require(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingParameter(name))
    } else {
        Ok(())
    }
}
