use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::fmt;

/// One-way digest of a raw endpoint string.
///
/// Two instances pointing at the same endpoint produce equal fingerprints,
/// which is all the ledger needs for duplicate detection. The token is a
/// fixed-length rendering of a SHA-256 digest, so the raw endpoint is never
/// stored, compared, or logged in clear.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EndpointFingerprint(String);

impl EndpointFingerprint {
    /// Digest the UTF-8 bytes of `endpoint`.
    ///
    /// Returns `None` when the endpoint is blank, which the validator
    /// reports as an unresolvable endpoint. This is reachable when a
    /// provider's parse hook rewrites the endpoint to an empty string.
    pub fn compute(endpoint: &str) -> Option<Self> {
        if endpoint.trim().is_empty() {
            return None;
        }
        let digest = Sha256::digest(endpoint.as_bytes());
        Some(Self(STANDARD_NO_PAD.encode(digest)))
    }

    /// Printable token form used as the ledger's equality oracle.
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EndpointFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EndpointFingerprint").field(&self.0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_equal_inputs() {
        let a = EndpointFingerprint::compute("https://vault.local/a").expect("fingerprint");
        let b = EndpointFingerprint::compute("https://vault.local/a").expect("fingerprint");
        assert_eq!(a, b);
        assert_eq!(a.token(), b.token());
    }

    #[test]
    fn distinct_for_different_inputs() {
        let a = EndpointFingerprint::compute("https://vault.local/a").expect("fingerprint");
        let b = EndpointFingerprint::compute("https://vault.local/b").expect("fingerprint");
        assert_ne!(a, b);
    }

    #[test]
    fn token_is_fixed_length_and_opaque() {
        let endpoint = "https://vault.local/team/database-credentials";
        let fp = EndpointFingerprint::compute(endpoint).expect("fingerprint");
        // 32-byte digest rendered as unpadded base64.
        assert_eq!(fp.token().len(), 43);
        assert!(!fp.token().contains("vault"));
    }

    #[test]
    fn blank_input_is_unresolvable() {
        assert!(EndpointFingerprint::compute("").is_none());
        assert!(EndpointFingerprint::compute("   ").is_none());
    }
}
