//! Read-only ledger access for the hint service.
//!
//! The hint engine only ever needs four reads, split over two traits:
//!
//! * [`RegistryReader`]: current round plus forward traversal of the ordered
//!   transcoder pool (`first`, then `next` until the zero address).
//! * [`RoleReader`]: which orchestrator a delegator is bonded to.
//!
//! [`RpcLedger`] implements both over Ethereum JSON-RPC. With the `testing`
//! feature, `MemoryLedger` is an in-process implementation with failure
//! injection, used by tests across the workspace.

mod abi;
mod error;
#[cfg(any(test, feature = "testing"))]
mod memory;
mod rpc;

use async_trait::async_trait;
pub use error::{ReadError, Result};
use hintd_primitives::{Address, Round};
#[cfg(any(test, feature = "testing"))]
pub use memory::MemoryLedger;
pub use rpc::{Contracts, RpcLedger};

/// Round and pool traversal reads.
///
/// Every call may suspend on network I/O. Implementations hold no cache.
#[async_trait]
pub trait RegistryReader: Send + Sync + 'static {
	/// Returns the current protocol round.
	async fn current_round(&self) -> Result<Round>;

	/// Returns the head of the pool, or [`Address::ZERO`] when the pool is empty.
	async fn first_entry(&self) -> Result<Address>;

	/// Returns the member after `entry`, or [`Address::ZERO`] at the tail.
	///
	/// Fails when `entry` is not a pool member.
	async fn next_entry(&self, entry: Address) -> Result<Address>;
}

/// Delegator to orchestrator reads.
#[async_trait]
pub trait RoleReader: Send + Sync + 'static {
	/// Returns the orchestrator `delegator` is bonded to ([`Address::ZERO`] if unbonded).
	async fn delegate_of(&self, delegator: Address) -> Result<Address>;
}
