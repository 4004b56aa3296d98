use thiserror::Error;

/// Errors from vote tree operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MerkleError {
    #[error("leaf index {index} is out of range (leaf_count={leaf_count})")]
    IndexOutOfRange { index: usize, leaf_count: usize },
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
