use serde::{Deserialize, Serialize};
use vote_anchor_merkle::{CostContext, Digest, HashAlgorithm, OperationCost, vote_preimage};

/// The fields of a cast vote that make up its leaf digest.
///
/// Fields are opaque strings; whoever records the vote is responsible for
/// validating them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Identity of the voting shareholder.
    pub voter_id: String,
    /// Resolution the vote was cast on.
    pub resolution_id: String,
    /// Chosen option, e.g. `for`, `against` or `abstain`.
    pub vote_value: String,
    /// When the vote was cast, in the recorder's canonical format.
    pub timestamp: String,
}

impl VoteRecord {
    /// Convenience constructor.
    pub fn new(
        voter_id: impl Into<String>,
        resolution_id: impl Into<String>,
        vote_value: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        VoteRecord {
            voter_id: voter_id.into(),
            resolution_id: resolution_id.into(),
            vote_value: vote_value.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Leaf digest of this vote under `algorithm`.
    pub fn digest(&self, algorithm: HashAlgorithm) -> Digest {
        self.digest_with_cost(algorithm).value
    }

    /// Leaf digest together with one leaf hash over the preimage bytes.
    pub fn digest_with_cost(&self, algorithm: HashAlgorithm) -> CostContext<Digest> {
        let preimage = vote_preimage(
            &self.voter_id,
            &self.resolution_id,
            &self.vote_value,
            &self.timestamp,
        );
        CostContext {
            value: algorithm.hash_bytes(preimage.as_bytes()),
            cost: OperationCost {
                hash_node_calls: 0,
                hash_leaf_calls: 1,
                hash_byte_calls: preimage.len() as u64,
            },
        }
    }
}
