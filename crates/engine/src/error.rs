use std::time::Duration;

use hintd_ledger::ReadError;
use hintd_primitives::{Address, AddressParseError};
use thiserror::Error;

/// Reasons the pool could not be read or rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
	#[error(transparent)]
	Read(#[from] ReadError),

	/// The remote pool links back to an entry already visited.
	#[error("pool traversal revisited {entry}")]
	Cycle { entry: Address },

	/// The remote pool has more members than the configured bound.
	#[error("pool exceeds {limit} entries")]
	TooLarge { limit: usize },

	#[error("pool rebuild exceeded {0:?}")]
	TimedOut(Duration),
}

/// Errors returned to lookup callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
	/// The address string was missing or malformed. No remote read was made.
	#[error("invalid address: {0}")]
	InvalidInput(#[from] AddressParseError),

	/// The address is not a member of the current round's pool.
	#[error("{0} is not in the current pool")]
	NotFound(Address),

	#[error("ledger unavailable: {0}")]
	SourceUnavailable(#[from] SourceError),
}

impl From<ReadError> for LookupError {
	fn from(error: ReadError) -> Self {
		Self::SourceUnavailable(SourceError::Read(error))
	}
}
