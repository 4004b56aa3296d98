//! Proof verification.
//!
//! Pure functions over a root, a leaf and a sibling path. Nothing here
//! touches a built tree, so an auditor holding only the published root can
//! check a vote independently. A malformed or mismatched proof yields
//! `false`, never an error.

use crate::{Digest, HashAlgorithm, InclusionProof, ProofStep, Side};

/// Fold `steps` over `leaf`, returning the implied root.
pub fn compute_root(algorithm: HashAlgorithm, leaf: &Digest, steps: &[ProofStep]) -> Digest {
    steps.iter().fold(leaf.clone(), |running, step| match step.side {
        Side::Left => algorithm.combine(&step.sibling, &running),
        Side::Right => algorithm.combine(&running, &step.sibling),
    })
}

/// Check a SHA-256 inclusion proof.
pub fn verify_inclusion(root: &Digest, leaf: &Digest, steps: &[ProofStep]) -> bool {
    verify_inclusion_with(HashAlgorithm::Sha256, root, leaf, steps)
}

/// Check an inclusion proof under `algorithm`.
pub fn verify_inclusion_with(
    algorithm: HashAlgorithm,
    root: &Digest,
    leaf: &Digest,
    steps: &[ProofStep],
) -> bool {
    &compute_root(algorithm, leaf, steps) == root
}

impl InclusionProof {
    /// Check this proof for `leaf` against `root`.
    pub fn verify(&self, algorithm: HashAlgorithm, root: &Digest, leaf: &Digest) -> bool {
        verify_inclusion_with(algorithm, root, leaf, &self.steps)
    }
}
