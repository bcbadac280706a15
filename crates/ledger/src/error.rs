use hintd_primitives::Address;
use thiserror::Error;

/// Failure of one ledger read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
	/// The request never produced an HTTP response (connect, TLS, timeout, body).
	#[error("transport error: {0}")]
	Transport(String),

	/// The endpoint answered with a non-success HTTP status.
	#[error("endpoint returned HTTP {status}")]
	Status { status: u16 },

	/// The node answered with a JSON-RPC error object.
	#[error("rpc error {code}: {message}")]
	Rpc { code: i64, message: String },

	/// The response could not be decoded into the expected value.
	#[error("malformed response: {0}")]
	Decode(String),

	/// Traversal was asked to step from an address that is not in the pool.
	#[error("{0} is not a pool member")]
	UnknownEntry(Address),
}

/// Result type for ledger reads.
pub type Result<T> = std::result::Result<T, ReadError>;
