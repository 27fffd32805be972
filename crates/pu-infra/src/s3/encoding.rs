/// Percent-encode an object key for a URL path, keeping `/` separators.
///
/// Only RFC 3986 unreserved characters pass through, which is also the form
/// Signature V4 expects in the canonical URI.
pub fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Same as [`encode_key`] but `/` is encoded too (query components).
pub(crate) fn encode_component(value: &str) -> String {
    encode_key(value).replace('/', "%2F")
}
