//! Hash function selection for Merkle commitment and the Fiat-Shamir
//! transcript. The specification's configuration exposes a choice of two
//! digest algorithms (§6.6); rather than hand-roll them the way the
//! teacher's `crypto/blake2s.rs` hand-rolls a field-element-oriented
//! Blake2s variant, we reach for the `sha2` and `blake2` crates, matching
//! the ecosystem-crate approach the teacher itself takes for its default
//! hash (`blake3`, pulled in as a dependency rather than implemented).

use blake2::Blake2s256;
use serde::{ Deserialize, Serialize };
use sha2::{ Digest, Sha256 };

/// The digest produced by every `HashAlgorithm` is 32 bytes.
pub const DIGEST_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Sha256,
    Blake2s256,
}

impl HashAlgorithm {
    pub fn digest_size(self) -> usize {
        DIGEST_SIZE
    }

    /// Hashes `data` and writes the digest into `out` (must be exactly
    /// `DIGEST_SIZE` bytes long).
    pub fn hash(self, data: &[u8], out: &mut [u8]) {
        debug_assert_eq!(out.len(), DIGEST_SIZE);
        match self {
            HashAlgorithm::Sha256 => {
                let digest = Sha256::digest(data);
                out.copy_from_slice(&digest);
            }
            HashAlgorithm::Blake2s256 => {
                let digest = Blake2s256::digest(data);
                out.copy_from_slice(&digest);
            }
        }
    }

    /// Hashes the concatenation of two digests together, as used when
    /// building internal Merkle tree nodes from their two children.
    pub fn merge(self, left: &[u8], right: &[u8]) -> [u8; DIGEST_SIZE] {
        let mut buf = Vec::with_capacity(left.len() + right.len());
        buf.extend_from_slice(left);
        buf.extend_from_slice(right);
        let mut out = [0u8; DIGEST_SIZE];
        self.hash(&buf, &mut out);
        out
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Blake2s256
    }
}

#[cfg(test)]
mod tests {
    use super::HashAlgorithm;

    #[test]
    fn sha256_is_deterministic() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        HashAlgorithm::Sha256.hash(b"leaf-data", &mut a);
        HashAlgorithm::Sha256.hash(b"leaf-data", &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn blake2s256_is_deterministic() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        HashAlgorithm::Blake2s256.hash(b"leaf-data", &mut a);
        HashAlgorithm::Blake2s256.hash(b"leaf-data", &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn different_algorithms_disagree() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        HashAlgorithm::Sha256.hash(b"leaf-data", &mut a);
        HashAlgorithm::Blake2s256.hash(b"leaf-data", &mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn merge_is_order_sensitive() {
        let h = HashAlgorithm::Sha256;
        let left = [1u8; 32];
        let right = [2u8; 32];
        assert_ne!(h.merge(&left, &right), h.merge(&right, &left));
    }
}
