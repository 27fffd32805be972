//! Name generation for captured resources.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::distr::{Alphanumeric, SampleString};

use crate::resource::IncompleteResource;
use crate::settings::NamingMethod;

/// Length of a `ShortHash` name.
pub const SHORT_HASH_LEN: usize = 8;

const RANDOM_ID_LEN: usize = 16;

/// Result of applying a naming method without any user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedName {
    Ready(String),
    /// The method needs free text from the user; `suggestion` pre-fills the input.
    AskUser { suggestion: Option<String> },
}

/// Derive a name for `resource` with `method`.
///
/// `now_ms` feeds the timestamp based methods.
pub fn generate_name(
    method: NamingMethod,
    resource: &IncompleteResource,
    now_ms: i64,
) -> GeneratedName {
    let name = match method {
        NamingMethod::Hash => content_hash(&resource.data),
        NamingMethod::ShortHash => short_hash(&resource.data),
        NamingMethod::Uuid => uuid::Uuid::new_v4().to_string(),
        NamingMethod::RandomId => random_id(),
        NamingMethod::UnixTimestamp => now_ms.to_string(),
        NamingMethod::ReadableTimestamp => readable_timestamp(now_ms),
        NamingMethod::PromptUser => {
            return GeneratedName::AskUser {
                suggestion: resource.name.clone(),
            }
        }
    };
    GeneratedName::Ready(name)
}

/// MD5 hex digest of the content.
pub fn content_hash(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

pub fn short_hash(data: &[u8]) -> String {
    let mut hash = content_hash(data);
    hash.truncate(SHORT_HASH_LEN);
    hash
}

pub fn random_id() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), RANDOM_ID_LEN)
}

/// ISO-8601 UTC timestamp with `:` and `.` replaced by `-`.
pub fn readable_timestamp(now_ms: i64) -> String {
    let at = DateTime::<Utc>::from_timestamp_millis(now_ms).unwrap_or_default();
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}
