use vote_anchor_merkle::{Digest, HashAlgorithm, InclusionProof};

use crate::VoteRecord;

/// Third-party inclusion check.
///
/// Re-derives the leaf digest from the auditor's own copy of the vote and
/// folds `proof` over it, so neither the store nor the proof generator has to
/// be trusted. Returns `false` for any mismatch.
pub fn audit_vote(
    algorithm: HashAlgorithm,
    root: &Digest,
    vote: &VoteRecord,
    proof: &InclusionProof,
) -> bool {
    proof.verify(algorithm, root, &vote.digest(algorithm))
}
