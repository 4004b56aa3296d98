use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::Digest;

/// The 256-bit hash function a tree (and its leaves) is computed with.
///
/// The choice is part of an anchor's identity: a root computed with one
/// algorithm never verifies under the other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256.
    #[default]
    Sha256,
    /// Blake3 with 32-byte output.
    Blake3,
}

impl HashAlgorithm {
    /// Hash arbitrary bytes.
    pub fn hash_bytes(self, bytes: &[u8]) -> Digest {
        self.hash_parts(&[bytes])
    }

    /// Parent digest: `H(left_hex || right_hex)`, no separator.
    pub fn combine(self, left: &Digest, right: &Digest) -> Digest {
        self.hash_parts(&[left.as_bytes(), right.as_bytes()])
    }

    /// Root of a tree with no leaves: the digest of the empty input.
    pub fn empty_digest(self) -> Digest {
        self.hash_parts(&[])
    }

    fn hash_parts(self, parts: &[&[u8]]) -> Digest {
        match self {
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                for part in parts {
                    hasher.update(part);
                }
                Digest::from_bytes(&hasher.finalize())
            }
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                for part in parts {
                    hasher.update(part);
                }
                Digest::from_bytes(hasher.finalize().as_bytes())
            }
        }
    }
}
