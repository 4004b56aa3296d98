//! Inclusion proofs for a single leaf of a [`VoteMerkleTree`].
//!
//! A proof lists the sibling met at every layer transition on the way from
//! the leaf to the root, together with the side the sibling sits on. Layers
//! where the node was carried up without a partner contribute no step.
//!
//! [`VoteMerkleTree`]: crate::VoteMerkleTree

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::{Digest, MerkleError};

/// Which side of the running hash the sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left operand: `H(sibling || running)`.
    Left,
    /// Sibling is the right operand: `H(running || sibling)`.
    Right,
}

impl Side {
    /// The opposite side.
    pub fn flipped(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One layer transition of an inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ProofStep {
    /// Digest of the sibling node.
    pub sibling: Digest,
    /// Side the sibling sits on.
    pub side: Side,
}

/// Proof that a leaf is included under a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct InclusionProof {
    /// Index of the proved leaf in the leaf layer.
    pub leaf_index: u64,
    /// Sibling path, leaf layer first.
    pub steps: Vec<ProofStep>,
}

impl InclusionProof {
    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, MerkleError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| MerkleError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, MerkleError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 100 * 1024 * 1024 }>(); // 100MB limit
        let (proof, consumed): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| MerkleError::InvalidProof(format!("decode error: {}", e)))?;
        if consumed != bytes.len() {
            return Err(MerkleError::InvalidProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - consumed
            )));
        }
        Ok(proof)
    }
}

/// Inclusion proof read directly off persisted layers, without rehydrating
/// a tree.
///
/// Fails with [`MerkleError::IndexOutOfRange`] if `leaf_index` is not below
/// `leaf_count` or the leaf layer is shorter than `leaf_count`.
pub fn proof_from_layers(
    layers: &[Vec<Digest>],
    leaf_count: usize,
    leaf_index: usize,
) -> Result<InclusionProof, MerkleError> {
    let available = layers.first().map_or(0, |leaves| leaves.len().min(leaf_count));
    if leaf_index >= available {
        return Err(MerkleError::IndexOutOfRange {
            index: leaf_index,
            leaf_count,
        });
    }
    Ok(generate_proof(layers, leaf_index))
}

/// Walk `layers` bottom-up collecting siblings for `leaf_index`.
///
/// The caller has checked `leaf_index` against the leaf count.
fn generate_proof(layers: &[Vec<Digest>], leaf_index: usize) -> InclusionProof {
    let mut steps = Vec::with_capacity(layers.len().saturating_sub(1));
    let mut index = leaf_index;

    for layer in &layers[..layers.len().saturating_sub(1)] {
        let sibling = if index % 2 == 0 {
            layer.get(index + 1).map(|digest| (digest, Side::Right))
        } else {
            layer.get(index - 1).map(|digest| (digest, Side::Left))
        };
        if let Some((digest, side)) = sibling {
            steps.push(ProofStep {
                sibling: digest.clone(),
                side,
            });
        }
        index /= 2;
    }

    InclusionProof {
        leaf_index: leaf_index as u64,
        steps,
    }
}
