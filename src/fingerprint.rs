use sha2::{Digest, Sha256};

/// Application-level salt mixed into every digest. The fingerprint is a dedup
/// identity, not a security boundary.
const FINGERPRINT_SALT: &str = "k07382";

/// Stable dedup identity for an article: SHA-256 over salt + description,
/// lowercase hex. Byte-identical descriptions always collide, two empty
/// descriptions included; that is accepted rather than special-cased.
pub fn fingerprint(description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(FINGERPRINT_SALT.as_bytes());
    hasher.update(description.as_bytes());
    hex::encode(hasher.finalize())
}
