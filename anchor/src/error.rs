use thiserror::Error;
use vote_anchor_merkle::{Digest, MerkleError};

/// Errors from session anchoring.
#[derive(Debug, Error)]
pub enum AnchorError {
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    #[error("no anchor for session {0}")]
    SessionNotFound(String),
    #[error("vote {digest} is not anchored in session {session_id}")]
    VoteNotAnchored { session_id: String, digest: Digest },
    #[error("store error: {0}")]
    StoreError(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid anchor: {0}")]
    InvalidAnchor(String),
}
