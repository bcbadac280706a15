//! Minimal contract ABI encoding for the four reads the service performs.
//!
//! Selectors are the first four bytes of the keccak-256 of the signature.

use hintd_primitives::Address;

use crate::{ReadError, Result};

const WORD: usize = 32;

/// `currentRound()` on the RoundsManager.
pub(crate) const CURRENT_ROUND: [u8; 4] = [0x8a, 0x19, 0xc8, 0xbc];
/// `getFirstTranscoderInPool()` on the BondingManager.
pub(crate) const FIRST_TRANSCODER: [u8; 4] = [0x88, 0xa6, 0xc7, 0x49];
/// `getNextTranscoderInPool(address)` on the BondingManager.
pub(crate) const NEXT_TRANSCODER: [u8; 4] = [0x23, 0x5c, 0x96, 0x03];
/// `getDelegator(address)` on the BondingManager.
pub(crate) const GET_DELEGATOR: [u8; 4] = [0xa6, 0x4a, 0xd5, 0x95];

/// Index of `delegateAddress` in the `getDelegator` return tuple.
pub(crate) const DELEGATE_ADDRESS_WORD: usize = 2;

/// Encodes calldata for `selector` with address arguments, as `0x`-prefixed hex.
pub(crate) fn encode_call(selector: [u8; 4], args: &[Address]) -> String {
	let mut data = Vec::with_capacity(4 + args.len() * WORD);
	data.extend_from_slice(&selector);
	for arg in args {
		data.extend_from_slice(&[0u8; WORD - 20]);
		data.extend_from_slice(arg.as_bytes());
	}
	format!("0x{}", hex::encode(data))
}

/// Decodes a `0x`-prefixed hex string returned by `eth_call`.
pub(crate) fn decode_hex(raw: &str) -> Result<Vec<u8>> {
	let digits = raw
		.strip_prefix("0x")
		.ok_or_else(|| ReadError::Decode(format!("result is not 0x-prefixed: {raw:?}")))?;
	hex::decode(digits).map_err(|e| ReadError::Decode(format!("result is not hex: {e}")))
}

fn word(data: &[u8], index: usize) -> Result<&[u8]> {
	let start = index * WORD;
	data.get(start..start + WORD).ok_or_else(|| {
		ReadError::Decode(format!(
			"expected at least {} words of return data, got {} bytes",
			index + 1,
			data.len()
		))
	})
}

/// Reads an address from return word `index`.
pub(crate) fn address_at(data: &[u8], index: usize) -> Result<Address> {
	let word = word(data, index)?;
	let (pad, tail) = word.split_at(WORD - 20);
	if pad.iter().any(|b| *b != 0) {
		return Err(ReadError::Decode(format!("word {index} is not an address")));
	}
	let mut bytes = [0u8; 20];
	bytes.copy_from_slice(tail);
	Ok(Address::new(bytes))
}

/// Reads a uint256 from return word `index`, rejecting values above `u64::MAX`.
pub(crate) fn u64_at(data: &[u8], index: usize) -> Result<u64> {
	let word = word(data, index)?;
	let (high, low) = word.split_at(WORD - 8);
	if high.iter().any(|b| *b != 0) {
		return Err(ReadError::Decode(format!("word {index} does not fit in u64")));
	}
	let mut bytes = [0u8; 8];
	bytes.copy_from_slice(low);
	Ok(u64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addr(s: &str) -> Address {
		s.parse().unwrap()
	}

	#[test]
	fn encodes_selector_only_call() {
		assert_eq!(encode_call(CURRENT_ROUND, &[]), "0x8a19c8bc");
		assert_eq!(encode_call(FIRST_TRANSCODER, &[]), "0x88a6c749");
	}

	#[test]
	fn encodes_address_argument_left_padded() {
		let data = encode_call(NEXT_TRANSCODER, &[addr("0x35Bcf3c30594191d53231E4FF333E8A770453e40")]);
		assert_eq!(
			data,
			"0x235c9603\
			 00000000000000000000000035bcf3c30594191d53231e4ff333e8a770453e40"
		);
	}

	#[test]
	fn decodes_address_and_round_words() {
		let raw = format!(
			"0x{}{}",
			"000000000000000000000000dd6f56dcc28d3f5f27084381fe8df634985cc39f",
			"0000000000000000000000000000000000000000000000000000000000000d05"
		);
		let data = decode_hex(&raw).unwrap();
		assert_eq!(address_at(&data, 0).unwrap(), addr("0xdd6f56DcC28D3F5f27084381fE8Df634985cc39f"));
		assert_eq!(u64_at(&data, 1).unwrap(), 0xd05);
	}

	#[test]
	fn rejects_short_or_dirty_words() {
		let data = decode_hex("0x").unwrap();
		assert!(matches!(address_at(&data, 0), Err(ReadError::Decode(_))));

		let dirty = decode_hex(&format!("0x01{}", "00".repeat(31))).unwrap();
		assert!(matches!(address_at(&dirty, 0), Err(ReadError::Decode(_))));
		assert!(matches!(u64_at(&dirty, 0), Err(ReadError::Decode(_))));

		assert!(matches!(decode_hex("1234"), Err(ReadError::Decode(_))));
		assert!(matches!(decode_hex("0xzz"), Err(ReadError::Decode(_))));
	}
}
