#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bounds on the closure searches of [`HolonomicFunction`](super::HolonomicFunction).
///
/// Each search grows an ansatz one order at a time until it finds a non-trivial solution. For
/// inputs of order `a` and `b`, a solution always exists at order `a + b` for addition and
/// `a * b` for multiplication, so the default limit is only reached by unusually large
/// inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchLimits {
    /// The largest ansatz order (for addition) or number of derivatives (for multiplication)
    /// to try before failing with
    /// [`ComputationLimitExceeded`](super::error::ComputationLimitExceeded).
    pub max_order: usize,
}

impl SearchLimits {
    /// Creates limits with the given maximum order.
    pub fn new(max_order: usize) -> Self {
        Self { max_order }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self { max_order: 32 }
    }
}
