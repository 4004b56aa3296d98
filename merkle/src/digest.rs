use std::{borrow::Borrow, fmt};

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::MerkleError;

/// A hex-encoded hash output identifying a vote or a tree node.
///
/// Digests are compared and ordered by their string form, which for
/// lowercase hex of equal length matches the order of the underlying bytes.
/// Leaves are opaque: any string is accepted, only hashes produced by this
/// crate are guaranteed to be 64 lowercase hex characters.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode,
    Decode,
)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Wrap an already hex-encoded digest.
    pub fn new(hex: impl Into<String>) -> Self {
        Digest(hex.into())
    }

    /// Hex-encode raw hash output.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Digest(hex::encode(bytes))
    }

    /// Decode the hex form back into raw bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MerkleError> {
        hex::decode(&self.0)
            .map_err(|e| MerkleError::InvalidData(format!("digest is not hex: {}", e)))
    }

    /// The digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the digest, returning its string form.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Bytes fed to the hash primitive when this digest is an operand.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Digest {
    fn from(value: String) -> Self {
        Digest(value)
    }
}

impl From<&str> for Digest {
    fn from(value: &str) -> Self {
        Digest(value.to_owned())
    }
}

impl From<Digest> for String {
    fn from(value: Digest) -> Self {
        value.0
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Digest {
    fn borrow(&self) -> &str {
        &self.0
    }
}
