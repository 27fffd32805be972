//! S3 compatible object storage.

mod encoding;
mod signer;
mod uploader;

pub use encoding::encode_key;
pub use signer::{Credentials, SigV4Signer, EMPTY_PAYLOAD_SHA256, UNSIGNED_PAYLOAD};
pub use uploader::S3Uploader;
