#![deny(missing_docs)]
//! Interface crate to unify how the hash work of anchoring operations is
//! passed and retrieved.
//!
//! Building a vote tree, deriving vote digests, checking stored layers and
//! anchoring a session all report how much hashing they did, so callers can
//! budget large sessions and tests can pin the `O(n)` construction bound.

use std::ops::AddAssign;

pub mod context;

pub use context::{CostContext, CostResult, CostsExt};

/// Hash work performed by an operation (approximately).
///
/// Counters saturate instead of wrapping.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OperationCost {
    /// How many tree node digests were computed: pairwise merges of two
    /// child digests, plus the sentinel root of an empty tree.
    pub hash_node_calls: u32,
    /// How many vote records were hashed into leaf digests.
    pub hash_leaf_calls: u32,
    /// How many bytes were fed into the hash primitive.
    pub hash_byte_calls: u64,
}

impl AddAssign for OperationCost {
    fn add_assign(&mut self, rhs: Self) {
        self.hash_node_calls = self.hash_node_calls.saturating_add(rhs.hash_node_calls);
        self.hash_leaf_calls = self.hash_leaf_calls.saturating_add(rhs.hash_leaf_calls);
        self.hash_byte_calls = self.hash_byte_calls.saturating_add(rhs.hash_byte_calls);
    }
}

/// Macro to achieve a kind of what `?` operator does, but with `CostContext` on
/// top. Early termination adds the partial cost to the external accumulator
/// so previous costs won't be lost.
#[macro_export]
macro_rules! cost_return_on_error {
    ( &mut $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result_with_cost = { $($body)+ };
            let result = result_with_cost.unwrap_add_cost(&mut $cost);
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}
