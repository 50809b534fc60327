use std::io::Read;

use lreg_types::ContentHash;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g. `"lreg-document-v1"`) that is
/// prepended to every hash computation, so a document and a structured
/// record with identical bytes never share a digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for raw off-chain documents (files, uploads).
    pub const DOCUMENT: Self = Self {
        domain: "lreg-document-v1",
    };
    /// Hasher for structured records serialized as JSON.
    pub const RECORD: Self = Self {
        domain: "lreg-record-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    fn start(&self) -> blake3::Hasher {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentHash {
        let mut hasher = self.start();
        hasher.update(data);
        ContentHash::from_digest(*hasher.finalize().as_bytes())
    }

    /// Hash everything readable from `reader` with domain separation.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> Result<ContentHash, HasherError> {
        let mut hasher = self.start();
        let mut buf = [0u8; 16 * 1024];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(ContentHash::from_digest(*hasher.finalize().as_bytes()))
    }

    /// Hash a serializable value as JSON with domain separation.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ContentHash, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected digest.
    pub fn verify(&self, data: &[u8], expected: &ContentHash) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"donation receipt #1";
        assert_eq!(ContentHasher::DOCUMENT.hash(data), ContentHasher::DOCUMENT.hash(data));
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        assert_ne!(ContentHasher::DOCUMENT.hash(data), ContentHasher::RECORD.hash(data));
    }

    #[test]
    fn domain_hash_differs_from_plain_digest() {
        let data = b"test";
        assert_ne!(ContentHasher::DOCUMENT.hash(data), ContentHash::of(data));
    }

    #[test]
    fn verify_detects_tampering() {
        let id = ContentHasher::DOCUMENT.hash(b"original");
        assert!(ContentHasher::DOCUMENT.verify(b"original", &id));
        assert!(!ContentHasher::DOCUMENT.verify(b"tampered", &id));
    }

    #[test]
    fn reader_matches_slice_hash() {
        let data = vec![7u8; 40_000];
        let from_reader = ContentHasher::DOCUMENT
            .hash_reader(std::io::Cursor::new(&data))
            .unwrap();
        assert_eq!(from_reader, ContentHasher::DOCUMENT.hash(&data));
    }

    #[test]
    fn hash_json_is_stable_for_equal_values() {
        let a = serde_json::json!({"amount": 5000, "currency": "KRW"});
        let b = serde_json::json!({"amount": 5000, "currency": "KRW"});
        assert_eq!(
            ContentHasher::RECORD.hash_json(&a).unwrap(),
            ContentHasher::RECORD.hash_json(&b).unwrap()
        );
    }

    #[test]
    fn custom_domain() {
        let hasher = ContentHasher::new("vericerti-donation-v1");
        assert_eq!(hasher.domain(), "vericerti-donation-v1");
        assert_ne!(hasher.hash(b"data"), ContentHasher::DOCUMENT.hash(b"data"));
    }
}
