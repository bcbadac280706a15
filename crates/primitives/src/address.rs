use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of bytes in an account address.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address.
///
/// Parsing accepts `0x`/`0X` followed by 40 hex digits in any case, so
/// differently-cased spellings of one account compare equal. Display is always
/// lowercase with a `0x` prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
	/// The all-zero address. Terminates pool traversal and marks "no entry".
	pub const ZERO: Self = Self([0; ADDRESS_LEN]);

	pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
		Self(bytes)
	}

	/// Returns true for the zero sentinel.
	pub fn is_zero(&self) -> bool {
		*self == Self::ZERO
	}

	pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
		&self.0
	}
}

/// Rejection reasons for address strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
	#[error("address is empty")]
	Empty,
	#[error("address must start with 0x")]
	MissingPrefix,
	#[error("address must have 40 hex digits, got {0}")]
	InvalidLength(usize),
	#[error("address contains a non-hex character")]
	InvalidHex,
}

impl FromStr for Address {
	type Err = AddressParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.is_empty() {
			return Err(AddressParseError::Empty);
		}
		let digits = s
			.strip_prefix("0x")
			.or_else(|| s.strip_prefix("0X"))
			.ok_or(AddressParseError::MissingPrefix)?;
		if digits.len() != ADDRESS_LEN * 2 {
			return Err(AddressParseError::InvalidLength(digits.len()));
		}

		let mut bytes = [0u8; ADDRESS_LEN];
		hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressParseError::InvalidHex)?;
		Ok(Self(bytes))
	}
}

impl From<[u8; ADDRESS_LEN]> for Address {
	fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
		Self(bytes)
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Address({self})")
	}
}

impl Serialize for Address {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(serde::de::Error::custom)
	}
}
