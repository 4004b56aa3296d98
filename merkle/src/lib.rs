//! Merkle tree over vote digests.
//!
//! Leaves are hex digests of individual votes (see [`hash_vote`]). Each
//! parent is the hash of the raw concatenation of its two children's hex
//! strings:
//!
//! `parent = H(left_hex || right_hex)`
//!
//! A layer with an odd trailing node carries that node unchanged into the
//! next layer. Every layer is retained after construction so inclusion
//! proofs can be read off in `O(depth)`.
//!
//! Verification ([`verify_inclusion`]) needs only the published root, the
//! leaf digest and the proof, so independent auditors do not depend on the
//! tree or the server that built it.

#![warn(missing_docs)]

mod digest;
mod error;
mod hash;
mod leaf;
mod proof;
mod tree;
mod verify;


pub use digest::Digest;
pub use error::MerkleError;
pub use hash::HashAlgorithm;
pub use leaf::{VOTE_FIELD_DELIMITER, hash_vote, hash_vote_with, vote_preimage};
pub use proof::{InclusionProof, ProofStep, Side, proof_from_layers};
pub use tree::VoteMerkleTree;
pub use verify::{compute_root, verify_inclusion, verify_inclusion_with};
pub use vote_anchor_costs::{CostContext, CostResult, OperationCost};
