//! Digests of the source METS document.

use sha2::{Digest, Sha256};

/// Lowercase hex digests of the METS document bytes. Empty when the engine
/// runs on an in-memory tree with no source bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDigests {
    pub sha256: String,
    pub md5: String,
}

impl SourceDigests {
    pub fn of(bytes: &[u8]) -> Self {
        Self {
            sha256: hex::encode(Sha256::digest(bytes)),
            md5: format!("{:x}", md5::compute(bytes)),
        }
    }
}
