//! The persisted record of one anchored voting session.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use vote_anchor_costs::{CostResult, CostsExt, OperationCost, cost_return_on_error};
use vote_anchor_merkle::{
    Digest, HashAlgorithm, InclusionProof, MerkleError, VoteMerkleTree, proof_from_layers,
};

use crate::{AnchorError, LeafOrder};

/// Root, layers and metadata of a closed voting session.
///
/// An anchor is never edited. Re-anchoring a session replaces the whole
/// record through [`AnchorStore::replace`](crate::AnchorStore::replace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Anchor {
    /// Session the votes belong to.
    pub session_id: String,
    /// Hash used for the leaves and the tree.
    pub algorithm: HashAlgorithm,
    /// How the leaves were ordered before building.
    pub leaf_order: LeafOrder,
    /// Merkle root over all votes of the session.
    pub root: Digest,
    /// Number of votes anchored.
    pub leaf_count: u64,
    /// Every tree layer, leaves first, kept so proofs need no rebuild.
    pub layers: Vec<Vec<Digest>>,
    /// Unix time in milliseconds at which the session was anchored.
    pub created_at: u64,
    /// Simulated ledger transaction id. No chain is ever contacted.
    pub transaction_id: String,
}

impl Anchor {
    /// Capture a built tree as the anchor of `session_id`.
    pub fn from_tree(
        session_id: impl Into<String>,
        tree: VoteMerkleTree,
        leaf_order: LeafOrder,
        created_at: u64,
    ) -> Self {
        let session_id = session_id.into();
        let algorithm = tree.algorithm();
        let root = tree.root().clone();
        // usize never exceeds 64 bits on supported targets.
        let leaf_count = tree.leaf_count() as u64;
        let transaction_id =
            Self::simulated_transaction_id(algorithm, &session_id, &root, created_at);
        Anchor {
            session_id,
            algorithm,
            leaf_order,
            root,
            leaf_count,
            layers: tree.into_layers(),
            created_at,
            transaction_id,
        }
    }

    /// `0x` followed by the digest of `session_id-root-created_at`.
    pub fn simulated_transaction_id(
        algorithm: HashAlgorithm,
        session_id: &str,
        root: &Digest,
        created_at: u64,
    ) -> String {
        let preimage = format!("{}-{}-{}", session_id, root, created_at);
        format!("0x{}", algorithm.hash_bytes(preimage.as_bytes()))
    }

    /// Rehydrate the tree, checking its shape and that it ends in `root`.
    pub fn tree(&self) -> Result<VoteMerkleTree, AnchorError> {
        let tree =
            VoteMerkleTree::from_layers(self.algorithm, self.leaf_count()?, self.layers.clone())?;
        if tree.root() != &self.root {
            return Err(AnchorError::InvalidAnchor(format!(
                "stored root {} does not match top layer {}",
                self.root,
                tree.root()
            )));
        }
        Ok(tree)
    }

    /// Rehydrate the tree and recompute every stored parent digest.
    ///
    /// The cost covers the merges recomputed before any mismatch.
    pub fn validate(&self) -> CostResult<(), AnchorError> {
        let mut cost = OperationCost::default();
        let tree = match self.tree() {
            Ok(tree) => tree,
            Err(e) => return Err(e).wrap_with_cost(cost),
        };
        cost_return_on_error!(&mut cost, tree.validate_hashes().map_err(AnchorError::from));
        Ok(()).wrap_with_cost(cost)
    }

    /// Number of anchored votes as `usize`.
    pub fn leaf_count(&self) -> Result<usize, AnchorError> {
        usize::try_from(self.leaf_count).map_err(|_| {
            AnchorError::InvalidAnchor(format!(
                "anchor for session {} lists {} leaves, more than this platform can index",
                self.session_id, self.leaf_count
            ))
        })
    }

    /// Proof for the vote at `leaf_index`, read from the stored layers.
    pub fn proof(&self, leaf_index: usize) -> Result<InclusionProof, AnchorError> {
        let top = self.layers.last().and_then(|layer| layer.first());
        if top != Some(&self.root) {
            return Err(AnchorError::InvalidAnchor(format!(
                "top layer of session {} does not hold the stored root",
                self.session_id
            )));
        }
        Ok(proof_from_layers(&self.layers, self.leaf_count()?, leaf_index)?)
    }

    /// Check `proof` for `leaf` against this anchor's root.
    pub fn verify(&self, leaf: &Digest, proof: &InclusionProof) -> bool {
        proof.verify(self.algorithm, &self.root, leaf)
    }

    /// The anchored vote digests in leaf order.
    pub fn leaves(&self) -> &[Digest] {
        match self.layers.first() {
            Some(leaves) if self.leaf_count > 0 => leaves,
            _ => &[],
        }
    }

    /// Leaf index of the first vote whose digest equals `digest`.
    ///
    /// Sorted anchors are searched in `O(log n)`.
    pub fn leaf_index_of(&self, digest: &Digest) -> Option<usize> {
        let leaves = self.leaves();
        match self.leaf_order {
            LeafOrder::SortedByDigest => {
                let index = leaves.partition_point(|leaf| leaf < digest);
                (leaves.get(index) == Some(digest)).then_some(index)
            }
            LeafOrder::Insertion => leaves.iter().position(|leaf| leaf == digest),
        }
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, AnchorError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| AnchorError::InvalidAnchor(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    ///
    /// Rejects trailing bytes and records whose leaf layer length disagrees
    /// with `leaf_count`.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, AnchorError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 512 * 1024 * 1024 }>(); // 512MB limit
        let (anchor, consumed): (Self, usize) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| AnchorError::InvalidAnchor(format!("decode error: {}", e)))?;
        if consumed != bytes.len() {
            return Err(AnchorError::InvalidAnchor(format!(
                "{} trailing bytes after encoded anchor",
                bytes.len() - consumed
            )));
        }
        let stored_leaves = anchor.layers.first().map_or(0, Vec::len);
        if anchor.leaf_count > 0 && u64::try_from(stored_leaves).ok() != Some(anchor.leaf_count) {
            return Err(MerkleError::InvalidData(format!(
                "anchor for session {} lists {} leaves but stores {}",
                anchor.session_id, anchor.leaf_count, stored_leaves
            ))
            .into());
        }
        Ok(anchor)
    }
}
