use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::stream;
use pu_core::ports::{ObjectRef, UndoAction, UploadControl, UploadError, UploadOutcome, UploaderPort};
use pu_core::settings::S3Settings;
use pu_core::Resource;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, info};
use url::Url;

use super::encoding::encode_key;
use super::signer::{Credentials, SigV4Signer, EMPTY_PAYLOAD_SHA256, UNSIGNED_PAYLOAD};

/// Body chunk size; progress advances once per chunk.
const CHUNK_SIZE: usize = 64 * 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Uploads with single signed `PUT` requests.
#[derive(Debug, Clone)]
pub struct S3Uploader {
    settings: S3Settings,
    client: Client,
}

impl S3Uploader {
    pub fn new(settings: S3Settings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("build HTTP client failed")?;
        Ok(Self { settings, client })
    }

    /// `prefix + name`, plus `.extension` unless omitted or empty.
    pub fn object_key(&self, resource: &Resource) -> String {
        let mut key = format!("{}{}", self.settings.prefix, resource.name);
        if !self.settings.omit_extension && !resource.extension.is_empty() {
            key.push('.');
            key.push_str(&resource.extension);
        }
        key
    }

    /// Custom endpoints are always addressed path-style.
    pub fn object_url(&self, key: &str) -> Result<Url> {
        let s = &self.settings;
        let encoded = encode_key(key);
        let raw = match &s.endpoint {
            Some(endpoint) => format!(
                "{}/{}/{encoded}",
                endpoint.trim_end_matches('/'),
                s.bucket
            ),
            None if s.force_path_style => {
                format!("https://s3.{}.amazonaws.com/{}/{encoded}", s.region, s.bucket)
            }
            None => format!("https://{}.s3.{}.amazonaws.com/{encoded}", s.bucket, s.region),
        };
        Url::parse(&raw).with_context(|| format!("invalid object URL `{raw}`"))
    }

    /// Link inserted into the document.
    pub fn reference_uri(&self, key: &str) -> Result<String> {
        match &self.settings.public_url_base {
            Some(base) if !base.is_empty() => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                encode_key(key)
            )),
            _ => Ok(self.object_url(key)?.to_string()),
        }
    }

    fn signer(&self) -> SigV4Signer {
        SigV4Signer::new(
            Credentials {
                access_key_id: self.settings.access_key_id.clone(),
                secret_access_key: self.settings.secret_access_key.clone(),
                session_token: self.settings.session_token.clone(),
            },
            self.settings.region.clone(),
        )
    }

    fn signed(
        &self,
        method: Method,
        url: &Url,
        payload_hash: &str,
    ) -> Result<RequestBuilder> {
        let headers = self
            .signer()
            .sign(method.as_str(), url, &[], payload_hash, Utc::now())?;

        let mut request = self.client.request(method, url.clone());
        for (name, value) in headers {
            request = request.header(name, value);
        }
        Ok(request)
    }

    async fn delete_key(&self, key: &str) -> Result<()> {
        self.settings.validate()?;
        let url = self.object_url(key)?;
        debug!(%url, "deleting object");

        let response = self
            .signed(Method::DELETE, &url, EMPTY_PAYLOAD_SHA256)?
            .send()
            .await
            .with_context(|| format!("DELETE {url} failed"))?;
        ensure_success(response).await?;

        info!(key, "object deleted");
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(UploadError::Status {
        status: status.as_u16(),
        body,
    }
    .into())
}

/// Split the payload into chunks that report progress as the client pulls them.
fn progress_body(data: Bytes, control: UploadControl) -> reqwest::Body {
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| data.slice(start..(start + CHUNK_SIZE).min(data.len())))
        .collect();

    let stream = stream::iter(chunks.into_iter().map(move |chunk| {
        control.advance(chunk.len() as u64);
        Ok::<_, std::io::Error>(chunk)
    }));
    reqwest::Body::wrap_stream(stream)
}

#[async_trait]
impl UploaderPort for S3Uploader {
    fn backend(&self) -> &'static str {
        "s3"
    }

    fn validate(&self) -> Result<()> {
        Ok(self.settings.validate()?)
    }

    async fn upload(&self, resource: &Resource, control: UploadControl) -> Result<UploadOutcome> {
        self.settings.validate()?;

        let key = self.object_key(resource);
        let url = self.object_url(&key)?;
        let reference_uri = self.reference_uri(&key)?;
        let size = resource.size_bytes();
        debug!(%url, size, "uploading object");

        let request = self
            .signed(Method::PUT, &url, UNSIGNED_PAYLOAD)?
            .header(CONTENT_TYPE, resource.mime.as_str())
            .header(CONTENT_LENGTH, size)
            .body(progress_body(resource.data.clone(), control.clone()));

        let cancel = control.cancellation().clone();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(UploadError::Cancelled.into()),
            response = request.send() => response.with_context(|| format!("PUT {url} failed"))?,
        };
        ensure_success(response).await?;
        info!(key = %key, "object uploaded");

        let this = self.clone();
        let undo_key = key.clone();
        let undo = UndoAction::new(format!("Delete {}", resource.file_name()), move || async move {
            this.delete_key(&undo_key).await
        });

        Ok(UploadOutcome {
            object_ref: ObjectRef(key),
            reference_uri,
            undo: Some(undo),
        })
    }

    async fn delete(&self, object: &ObjectRef) -> Result<()> {
        self.delete_key(object.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> S3Settings {
        S3Settings {
            region: "eu-central-1".to_string(),
            bucket: "media".to_string(),
            access_key_id: "AKID".to_string(),
            secret_access_key: "secret".to_string(),
            prefix: "notes/".to_string(),
            ..Default::default()
        }
    }

    fn resource(name: &str, extension: &str) -> Resource {
        Resource {
            mime: "image/png".to_string(),
            name: name.to_string(),
            extension: extension.to_string(),
            data: Bytes::from_static(b"png"),
        }
    }

    #[test]
    fn validate_reports_missing_bucket_without_a_request() {
        assert!(S3Uploader::new(settings()).unwrap().validate().is_ok());

        let err = S3Uploader::new(S3Settings {
            bucket: String::new(),
            ..settings()
        })
        .unwrap()
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("bucket"));
    }

    #[test]
    fn key_appends_extension_unless_omitted() {
        let uploader = S3Uploader::new(settings()).unwrap();
        assert_eq!(uploader.object_key(&resource("a1b2", "png")), "notes/a1b2.png");
        assert_eq!(uploader.object_key(&resource("blob", "")), "notes/blob");

        let omitting = S3Uploader::new(S3Settings {
            omit_extension: true,
            ..settings()
        })
        .unwrap();
        assert_eq!(omitting.object_key(&resource("a1b2", "png")), "notes/a1b2");
    }

    #[test]
    fn urls_follow_addressing_style() {
        let virtual_host = S3Uploader::new(settings()).unwrap();
        assert_eq!(
            virtual_host.object_url("notes/my shot.png").unwrap().as_str(),
            "https://media.s3.eu-central-1.amazonaws.com/notes/my%20shot.png"
        );

        let path_style = S3Uploader::new(S3Settings {
            force_path_style: true,
            ..settings()
        })
        .unwrap();
        assert_eq!(
            path_style.object_url("a.png").unwrap().as_str(),
            "https://s3.eu-central-1.amazonaws.com/media/a.png"
        );

        let custom = S3Uploader::new(S3Settings {
            endpoint: Some("http://localhost:9000/".to_string()),
            ..settings()
        })
        .unwrap();
        assert_eq!(
            custom.object_url("a.png").unwrap().as_str(),
            "http://localhost:9000/media/a.png"
        );
    }

    #[test]
    fn public_base_replaces_bucket_url() {
        let uploader = S3Uploader::new(S3Settings {
            public_url_base: Some("https://cdn.example.com/".to_string()),
            ..settings()
        })
        .unwrap();
        assert_eq!(
            uploader.reference_uri("notes/a.png").unwrap(),
            "https://cdn.example.com/notes/a.png"
        );
    }
}
