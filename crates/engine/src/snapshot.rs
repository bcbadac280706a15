//! Immutable per-round pool index.

use hintd_primitives::{Address, HintPair, Round};
use rustc_hash::FxHashMap;

use crate::SourceError;

/// Hint table for every pool member at one round.
///
/// For any member `e` with `next = f` (non-zero), `f.prev == e`, and the
/// reverse. Never mutated after [`SnapshotBuilder::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
	round: Round,
	head: Address,
	table: FxHashMap<Address, HintPair>,
}

impl PoolSnapshot {
	pub fn round(&self) -> Round {
		self.round
	}

	/// First member of the pool, zero when empty.
	pub fn head(&self) -> Address {
		self.head
	}

	pub fn get(&self, entry: Address) -> Option<HintPair> {
		self.table.get(&entry).copied()
	}

	pub fn contains(&self, entry: Address) -> bool {
		self.table.contains_key(&entry)
	}

	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Members in pool order, following `next` from the head.
	pub fn iter(&self) -> impl Iterator<Item = (Address, HintPair)> + '_ {
		let mut cursor = self.head;
		std::iter::from_fn(move || {
			let hints = self.table.get(&cursor)?;
			let entry = cursor;
			cursor = hints.next;
			Some((entry, *hints))
		})
	}
}

/// Incremental builder fed one member at a time in traversal order.
///
/// Each member is recorded with its predecessor and a zero successor; the
/// predecessor's successor is back-filled when the next member arrives.
#[derive(Debug)]
pub struct SnapshotBuilder {
	head: Address,
	prev: Address,
	table: FxHashMap<Address, HintPair>,
	max_entries: usize,
}

impl SnapshotBuilder {
	pub fn new(max_entries: usize) -> Self {
		Self {
			head: Address::ZERO,
			prev: Address::ZERO,
			table: FxHashMap::default(),
			max_entries,
		}
	}

	/// Appends the next member in traversal order.
	pub fn push(&mut self, entry: Address) -> Result<(), SourceError> {
		debug_assert!(!entry.is_zero(), "zero address terminates traversal");
		if self.table.contains_key(&entry) {
			return Err(SourceError::Cycle { entry });
		}
		if self.table.len() >= self.max_entries {
			return Err(SourceError::TooLarge { limit: self.max_entries });
		}

		self.table.insert(entry, HintPair::new(self.prev, Address::ZERO));
		if let Some(prev) = self.table.get_mut(&self.prev) {
			prev.next = entry;
		} else {
			self.head = entry;
		}
		self.prev = entry;
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	pub fn finish(self, round: Round) -> PoolSnapshot {
		PoolSnapshot {
			round,
			head: self.head,
			table: self.table,
		}
	}
}
