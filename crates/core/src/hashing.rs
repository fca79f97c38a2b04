//! SHA-256 hex digests for secrets that are only ever compared, never read back.
//!
//! Refresh tokens and one-time codes are stored as digests so a database leak
//! does not hand out live credentials.

use sha2::{Digest, Sha256};

/// Compute a lowercase SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest_for_abc() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_is_64_hex_chars() {
        let digest = sha256_hex(b"refresh-token");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
