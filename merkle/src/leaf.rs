//! Vote digests: the leaves of an anchored tree.
//!
//! The preimage layout is frozen. Changing the field order or the delimiter
//! changes every historical digest and breaks verification of sessions that
//! were already anchored.

use crate::{Digest, HashAlgorithm};

/// Separator placed between vote fields in the leaf preimage.
pub const VOTE_FIELD_DELIMITER: &str = "-";

/// The exact string hashed for a vote:
/// `voter_id-resolution_id-vote_value-timestamp`.
pub fn vote_preimage(
    voter_id: &str,
    resolution_id: &str,
    vote_value: &str,
    timestamp: &str,
) -> String {
    [voter_id, resolution_id, vote_value, timestamp].join(VOTE_FIELD_DELIMITER)
}

/// SHA-256 digest of one vote.
///
/// Inputs are not validated; checking that `vote_value` is an allowed
/// choice belongs to whoever records the vote.
pub fn hash_vote(voter_id: &str, resolution_id: &str, vote_value: &str, timestamp: &str) -> Digest {
    hash_vote_with(
        HashAlgorithm::Sha256,
        voter_id,
        resolution_id,
        vote_value,
        timestamp,
    )
}

/// Digest of one vote under `algorithm`.
pub fn hash_vote_with(
    algorithm: HashAlgorithm,
    voter_id: &str,
    resolution_id: &str,
    vote_value: &str,
    timestamp: &str,
) -> Digest {
    let preimage = vote_preimage(voter_id, resolution_id, vote_value, timestamp);
    algorithm.hash_bytes(preimage.as_bytes())
}
