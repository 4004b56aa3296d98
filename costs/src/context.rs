//! Operation results paired with the hash work spent producing them.

use crate::OperationCost;

/// A value together with the cost of computing it.
#[must_use]
#[derive(Debug, Eq, PartialEq)]
pub struct CostContext<T> {
    /// The operation's result.
    pub value: T,
    /// Hash work spent on it.
    pub cost: OperationCost,
}

impl<T> CostContext<T> {
    /// Move the value out, folding its cost into `acc_cost`.
    pub fn unwrap_add_cost(self, acc_cost: &mut OperationCost) -> T {
        *acc_cost += self.cost;
        self.value
    }

    /// Move the value out, discarding the cost.
    pub fn unwrap(self) -> T {
        self.value
    }
}

/// A fallible operation that reports cost even when it fails.
pub type CostResult<T, E> = CostContext<Result<T, E>>;

impl<T, E> CostResult<T, E> {
    /// Convert the error, keeping the cost.
    pub fn map_err<B>(self, f: impl FnOnce(E) -> B) -> CostResult<T, B> {
        CostContext {
            value: self.value.map_err(f),
            cost: self.cost,
        }
    }
}

/// Attach a cost to any value.
pub trait CostsExt {
    /// Pair `self` with `cost`.
    fn wrap_with_cost(self, cost: OperationCost) -> CostContext<Self>
    where
        Self: Sized,
    {
        CostContext { value: self, cost }
    }
}

impl<T> CostsExt for T {}
