use std::path::Path;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use vote_anchor_merkle::HashAlgorithm;

use crate::AnchorError;

/// Order in which vote digests become leaves.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum LeafOrder {
    /// Ascending by digest string, so the root does not depend on the order
    /// votes were cast in.
    #[default]
    SortedByDigest,
    /// The order votes were handed to the anchorer.
    Insertion,
}

/// Anchoring settings.
///
/// ```json
/// { "algorithm": "sha256", "leaf_order": "sorted_by_digest", "verify_on_load": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorConfig {
    /// Hash used for vote digests and tree nodes.
    pub algorithm: HashAlgorithm,
    /// Leaf ordering applied before the tree is built.
    pub leaf_order: LeafOrder,
    /// Recompute stored layers before serving proofs from them.
    pub verify_on_load: bool,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        AnchorConfig {
            algorithm: HashAlgorithm::Sha256,
            leaf_order: LeafOrder::SortedByDigest,
            verify_on_load: false,
        }
    }
}

impl AnchorConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, AnchorError> {
        serde_json::from_str(json).map_err(|e| AnchorError::InvalidConfig(e.to_string()))
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AnchorError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AnchorError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }
}
