use std::fmt;

use serde::{Deserialize, Serialize};

/// Protocol round number.
///
/// The pool is fixed for the duration of one round. Rounds only ever advance in
/// practice, but nothing here relies on that beyond ordering comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Round(pub u64);

impl Round {
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl From<u64> for Round {
	fn from(round: u64) -> Self {
		Self(round)
	}
}

impl fmt::Display for Round {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}
