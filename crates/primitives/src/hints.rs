use serde::{Deserialize, Serialize};

use crate::Address;

/// Neighbours of one pool member in traversal order.
///
/// Either side is [`Address::ZERO`] when the member sits at that end of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HintPair {
	pub prev: Address,
	pub next: Address,
}

impl HintPair {
	pub const fn new(prev: Address, next: Address) -> Self {
		Self { prev, next }
	}

	/// True when the member is the only one in the pool.
	pub fn is_alone(&self) -> bool {
		self.prev.is_zero() && self.next.is_zero()
	}
}
