//! Session anchoring for shareholder votes.
//!
//! When a voting session closes, every vote is reduced to a leaf digest, the
//! digests are ordered, and a [`VoteMerkleTree`] is built over them. The
//! resulting [`Anchor`] (root, leaf count, all layers and a simulated ledger
//! transaction id) is persisted through an [`AnchorStore`]. Later, any vote
//! of the session can be proved against the anchor without rebuilding the
//! tree, and [`audit_vote`] lets a third party check a proof using nothing
//! but its own copy of the vote and the published root.
//!
//! [`VoteMerkleTree`]: vote_anchor_merkle::VoteMerkleTree

#![warn(missing_docs)]

mod anchor;
mod audit;
mod config;
mod error;
mod session;
mod store;
mod vote;

#[cfg(test)]
mod tests;

pub use anchor::Anchor;
pub use audit::audit_vote;
pub use config::{AnchorConfig, LeafOrder};
pub use error::AnchorError;
pub use session::{AnchorReceipt, SessionAnchorer};
pub use store::{AnchorStore, MemAnchorStore};
pub use vote::VoteRecord;
pub use vote_anchor_merkle::{Digest, HashAlgorithm, InclusionProof, ProofStep, Side};
