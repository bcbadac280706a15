//! Basic value types for the transcoder-pool hint service.
//!
//! * [`Address`]: a 20-byte account address. The zero address is the pool's
//!   "no entry" sentinel.
//! * [`Round`]: the protocol round that fixes the pool for its duration.
//! * [`HintPair`]: predecessor and successor of one pool member.

mod address;
mod hints;
mod round;

pub use address::{Address, AddressParseError};
pub use hints::HintPair;
pub use round::Round;
