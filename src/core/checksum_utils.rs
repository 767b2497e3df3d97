/*
 * Content checksum helper. The merge engine deduplicates snippet files by
 * content regardless of name; hashing the text gives it a compact set key
 * instead of holding every snippet body twice for comparison.
 */
use sha2::{Digest, Sha256};

/// SHA256 of a text blob as a hex string.
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
