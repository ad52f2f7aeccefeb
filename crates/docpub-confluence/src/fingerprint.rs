//! Content fingerprints for change detection.
//!
//! A fingerprint is the SHA-256 digest of a page body, hex-encoded. Two
//! fingerprints are equal iff the bodies are byte-identical; the digest is
//! stable across runs and is stamped into remote page metadata
//! (`content-hash`) so external auditing can verify published content.

use std::fmt;

use sha2::{Digest, Sha256};

/// Deterministic fingerprint of a content body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    /// Fingerprint a content body.
    #[must_use]
    pub fn of(content: impl AsRef<[u8]>) -> Self {
        Self(hex::encode(Sha256::digest(content.as_ref())))
    }

    /// Wrap a previously stored hex digest (e.g. from page metadata).
    #[must_use]
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Hex digest string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deterministic() {
        let a = ContentFingerprint::of("<p>hello</p>");
        let b = ContentFingerprint::of("<p>hello</p>");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_content_distinct_fingerprints() {
        let corpus = [
            "",
            " ",
            "<p>hello</p>",
            "<p>hello</p>\n",
            "<p>Hello</p>",
            "# Title\n\nBody",
            "# Title\n\nBody.",
        ];

        for (i, a) in corpus.iter().enumerate() {
            for (j, b) in corpus.iter().enumerate() {
                let equal = ContentFingerprint::of(a) == ContentFingerprint::of(b);
                assert_eq!(equal, i == j, "corpus entries {i} and {j}");
            }
        }
    }

    #[test]
    fn test_known_digest() {
        // SHA-256 of the empty string
        assert_eq!(
            ContentFingerprint::of("").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_stored_round_trip() {
        let original = ContentFingerprint::of("content");
        let stored = ContentFingerprint::from_stored(original.as_str());
        assert_eq!(original, stored);
    }
}
