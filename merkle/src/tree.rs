use tracing::debug;
use vote_anchor_costs::{CostContext, CostResult, CostsExt, OperationCost};

use crate::{Digest, HashAlgorithm, InclusionProof, MerkleError, proof_from_layers};

/// An immutable Merkle tree over an ordered list of vote digests.
///
/// `layers[0]` holds the leaves in the order they were given; the last
/// layer holds exactly one digest, the root. Building is a single pure step
/// so there is no partially constructed tree to observe.
///
/// An empty leaf list yields one layer holding
/// [`HashAlgorithm::empty_digest`] and a `leaf_count` of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteMerkleTree {
    algorithm: HashAlgorithm,
    leaf_count: usize,
    layers: Vec<Vec<Digest>>,
}

impl VoteMerkleTree {
    /// Build a SHA-256 tree from `leaves`, kept in the given order.
    pub fn build(leaves: Vec<Digest>) -> Self {
        Self::build_with(HashAlgorithm::Sha256, leaves).unwrap()
    }

    /// Build a tree under `algorithm`, reporting the number of hash calls.
    ///
    /// A tree of `n >= 1` leaves costs exactly `n - 1` merges, since each
    /// merge removes one node and carried nodes cost nothing. The empty tree
    /// costs one node hash over zero bytes for its sentinel root.
    pub fn build_with(algorithm: HashAlgorithm, leaves: Vec<Digest>) -> CostContext<Self> {
        let mut cost = OperationCost::default();

        if leaves.is_empty() {
            cost.hash_node_calls = 1;
            let tree = VoteMerkleTree {
                algorithm,
                leaf_count: 0,
                layers: vec![vec![algorithm.empty_digest()]],
            };
            debug!(leaf_count = 0, "built empty vote tree");
            return tree.wrap_with_cost(cost);
        }

        let leaf_count = leaves.len();
        let mut layers = Vec::with_capacity(expected_layer_count(leaf_count));
        layers.push(leaves);

        while let Some(current) = layers.last().filter(|layer| layer.len() > 1) {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [left, right] => {
                        cost += merge_cost(left, right);
                        next.push(algorithm.combine(left, right));
                    }
                    _ => next.push(pair[0].clone()),
                }
            }
            layers.push(next);
        }

        debug!(
            leaf_count,
            layer_count = layers.len(),
            hash_node_calls = cost.hash_node_calls,
            "built vote tree"
        );

        VoteMerkleTree {
            algorithm,
            leaf_count,
            layers,
        }
        .wrap_with_cost(cost)
    }

    /// Rehydrate a tree from persisted layers.
    ///
    /// Only the shape is checked here; use
    /// [`validate_hashes`](Self::validate_hashes) to recompute the digests.
    pub fn from_layers(
        algorithm: HashAlgorithm,
        leaf_count: usize,
        layers: Vec<Vec<Digest>>,
    ) -> Result<Self, MerkleError> {
        let Some(first) = layers.first() else {
            return Err(MerkleError::InvalidData("tree has no layers".into()));
        };

        if leaf_count == 0 {
            if layers.len() != 1 || first.len() != 1 {
                return Err(MerkleError::InvalidData(format!(
                    "empty tree must have a single one-element layer, got {} layers",
                    layers.len()
                )));
            }
            return Ok(VoteMerkleTree {
                algorithm,
                leaf_count,
                layers,
            });
        }

        if first.len() != leaf_count {
            return Err(MerkleError::InvalidData(format!(
                "leaf layer has {} digests but leaf_count is {}",
                first.len(),
                leaf_count
            )));
        }

        for (depth, pair) in layers.windows(2).enumerate() {
            let expected = pair[0].len().div_ceil(2);
            if pair[0].len() < 2 || pair[1].len() != expected {
                return Err(MerkleError::InvalidData(format!(
                    "layer {} has {} digests, expected {} from a layer of {}",
                    depth + 1,
                    pair[1].len(),
                    expected,
                    pair[0].len()
                )));
            }
        }

        if layers.last().map(Vec::len) != Some(1) {
            return Err(MerkleError::InvalidData(
                "final layer must hold exactly one digest".into(),
            ));
        }

        Ok(VoteMerkleTree {
            algorithm,
            leaf_count,
            layers,
        })
    }

    /// Recompute every parent digest and compare with the stored layers.
    ///
    /// The cost counts the merges performed up to the first mismatch.
    pub fn validate_hashes(&self) -> CostResult<(), MerkleError> {
        let mut cost = OperationCost::default();

        if self.leaf_count == 0 {
            cost.hash_node_calls = 1;
            if self.root() != &self.algorithm.empty_digest() {
                return Err(MerkleError::InvalidData(
                    "empty tree root is not the empty digest".into(),
                ))
                .wrap_with_cost(cost);
            }
            return Ok(()).wrap_with_cost(cost);
        }

        for (depth, pair) in self.layers.windows(2).enumerate() {
            let (lower, upper) = (&pair[0], &pair[1]);
            for (position, stored) in upper.iter().enumerate() {
                let children = lower.get(2 * position..lower.len().min(2 * position + 2));
                let expected = match children {
                    Some([left, right]) => {
                        cost += merge_cost(left, right);
                        self.algorithm.combine(left, right)
                    }
                    Some([single]) => single.clone(),
                    _ => {
                        return Err(MerkleError::InvalidData(format!(
                            "layer {} position {} has no children",
                            depth + 1,
                            position
                        )))
                        .wrap_with_cost(cost);
                    }
                };
                if &expected != stored {
                    return Err(MerkleError::InvalidData(format!(
                        "digest mismatch at layer {} position {}: stored {}, computed {}",
                        depth + 1,
                        position,
                        stored,
                        expected
                    )))
                    .wrap_with_cost(cost);
                }
            }
        }
        Ok(()).wrap_with_cost(cost)
    }

    /// The root digest.
    pub fn root(&self) -> &Digest {
        // Construction guarantees a final one-element layer.
        &self.layers[self.layers.len() - 1][0]
    }

    /// Number of leaves the tree was built from.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of layers including the leaf layer and the root layer.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Hash algorithm the tree was built with.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// All layers, leaves first.
    pub fn layers(&self) -> &[Vec<Digest>] {
        &self.layers
    }

    /// Consume the tree, returning its layers for persistence.
    pub fn into_layers(self) -> Vec<Vec<Digest>> {
        self.layers
    }

    /// The leaf digests; empty for the empty tree.
    pub fn leaves(&self) -> &[Digest] {
        if self.leaf_count == 0 {
            &[]
        } else {
            &self.layers[0]
        }
    }

    /// Leaf digest at `index`, if present.
    pub fn leaf(&self, index: usize) -> Option<&Digest> {
        self.leaves().get(index)
    }

    /// Index of the first leaf equal to `digest`.
    pub fn position_of(&self, digest: &Digest) -> Option<usize> {
        self.leaves().iter().position(|leaf| leaf == digest)
    }

    /// Inclusion proof for the leaf at `leaf_index`.
    pub fn proof(&self, leaf_index: usize) -> Result<InclusionProof, MerkleError> {
        let proof = proof_from_layers(&self.layers, self.leaf_count, leaf_index)?;
        debug!(leaf_index, steps = proof.steps.len(), "generated inclusion proof");
        Ok(proof)
    }

    /// Verify `proof` for `leaf` against this tree's root.
    pub fn verify(&self, leaf: &Digest, proof: &InclusionProof) -> bool {
        proof.verify(self.algorithm, self.root(), leaf)
    }
}

/// One pairwise merge over the two operands' hex bytes.
fn merge_cost(left: &Digest, right: &Digest) -> OperationCost {
    OperationCost {
        hash_node_calls: 1,
        hash_leaf_calls: 0,
        hash_byte_calls: (left.as_str().len() + right.as_str().len()) as u64,
    }
}

/// `ceil(log2(n)) + 1` layers for `n >= 1` leaves, one for the empty tree.
pub(crate) fn expected_layer_count(leaf_count: usize) -> usize {
    if leaf_count <= 1 {
        1
    } else {
        (usize::BITS - (leaf_count - 1).leading_zeros()) as usize + 1
    }
}
