//! Upload policy decisions.
//!
//! Pure functions only: the application layer asks the user when a check
//! returns [`PolicyCheck::AskUser`].

use regex::{Regex, RegexBuilder};

use crate::resource::Resource;
use crate::settings::MultiFilePolicy;

/// Outcome of a single policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyCheck {
    Pass,
    Abort(PolicyAbort),
    /// Continue only if the user explicitly answers yes; otherwise abort with `on_decline`.
    AskUser {
        question: String,
        on_decline: PolicyAbort,
    },
}

/// Why a batch was not uploaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyAbort {
    #[error("uploading multiple files at once is disabled")]
    MultipleFilesDenied,

    #[error("upload of {count} files cancelled")]
    MultipleFilesDeclined { count: usize },

    #[error("upload cancelled: {total} bytes exceeds the limit of {limit} bytes")]
    SizeLimitDeclined { total: u64, limit: u64 },
}

/// Case-insensitive MIME allow-filter.
#[derive(Debug, Clone)]
pub struct MimeFilter(Regex);

impl MimeFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Self)
    }

    pub fn matches(&self, mime: &str) -> bool {
        self.0.is_match(mime)
    }

    /// Keeps the resources whose MIME matches, preserving order.
    pub fn retain(&self, batch: Vec<Resource>) -> Vec<Resource> {
        batch.into_iter().filter(|r| self.matches(&r.mime)).collect()
    }
}

/// Multi-file policy; only applies when the event carried more than one raw item.
pub fn check_multiple_files(raw_item_count: usize, policy: MultiFilePolicy) -> PolicyCheck {
    if raw_item_count <= 1 {
        return PolicyCheck::Pass;
    }
    match policy {
        MultiFilePolicy::Allow => PolicyCheck::Pass,
        MultiFilePolicy::Deny => PolicyCheck::Abort(PolicyAbort::MultipleFilesDenied),
        MultiFilePolicy::Prompt => PolicyCheck::AskUser {
            question: format!("Upload {raw_item_count} files?"),
            on_decline: PolicyAbort::MultipleFilesDeclined {
                count: raw_item_count,
            },
        },
    }
}

/// Size policy; a limit of 0 disables the check.
pub fn check_total_size(batch: &[Resource], limit: u64) -> PolicyCheck {
    if limit == 0 {
        return PolicyCheck::Pass;
    }
    let total: u64 = batch.iter().map(Resource::size_bytes).sum();
    if total <= limit {
        return PolicyCheck::Pass;
    }
    PolicyCheck::AskUser {
        question: format!(
            "The files to upload total {}, above the configured limit of {}. Upload anyway?",
            human_size(total),
            human_size(limit)
        ),
        on_decline: PolicyAbort::SizeLimitDeclined { total, limit },
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn resource(mime: &str, size: usize) -> Resource {
        Resource {
            mime: mime.to_string(),
            name: "r".to_string(),
            extension: String::new(),
            data: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn single_item_never_triggers_multi_file_policy() {
        for policy in [
            MultiFilePolicy::Allow,
            MultiFilePolicy::Deny,
            MultiFilePolicy::Prompt,
        ] {
            assert_eq!(check_multiple_files(1, policy), PolicyCheck::Pass);
            assert_eq!(check_multiple_files(0, policy), PolicyCheck::Pass);
        }
    }

    #[test]
    fn multi_file_policy_variants() {
        assert_eq!(check_multiple_files(3, MultiFilePolicy::Allow), PolicyCheck::Pass);
        assert_eq!(
            check_multiple_files(3, MultiFilePolicy::Deny),
            PolicyCheck::Abort(PolicyAbort::MultipleFilesDenied)
        );
        assert!(matches!(
            check_multiple_files(3, MultiFilePolicy::Prompt),
            PolicyCheck::AskUser {
                on_decline: PolicyAbort::MultipleFilesDeclined { count: 3 },
                ..
            }
        ));
    }

    #[test]
    fn zero_limit_disables_size_check() {
        let batch = vec![resource("image/png", 4096)];
        assert_eq!(check_total_size(&batch, 0), PolicyCheck::Pass);
    }

    #[test]
    fn size_check_asks_only_above_limit() {
        let batch = vec![resource("image/png", 600), resource("image/png", 400)];
        assert_eq!(check_total_size(&batch, 1000), PolicyCheck::Pass);
        assert!(matches!(
            check_total_size(&batch, 999),
            PolicyCheck::AskUser {
                on_decline: PolicyAbort::SizeLimitDeclined {
                    total: 1000,
                    limit: 999
                },
                ..
            }
        ));
    }

    #[test]
    fn mime_filter_is_case_insensitive_and_keeps_order() {
        let filter = MimeFilter::new("^IMAGE/").unwrap();
        let kept = filter.retain(vec![
            resource("image/png", 1),
            resource("application/pdf", 1),
            resource("image/gif", 1),
        ]);
        assert_eq!(
            kept.iter().map(|r| r.mime.as_str()).collect::<Vec<_>>(),
            vec!["image/png", "image/gif"]
        );
        assert!(MimeFilter::new("(").is_err());
    }

    #[test]
    fn human_size_formats_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(10 * 1024 * 1024), "10.0 MiB");
    }
}
