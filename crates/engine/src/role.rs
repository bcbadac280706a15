//! Delegator to orchestrator point cache.

use std::sync::Arc;

use hintd_ledger::RoleReader;
use hintd_primitives::Address;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::LookupError;

/// Remembers every delegation it has observed.
///
/// Entries are never invalidated, so a delegator that rebonds keeps its old
/// answer until the process restarts. Failed reads are not remembered.
pub struct RoleCache {
	reader: Arc<dyn RoleReader>,
	entries: RwLock<FxHashMap<Address, Address>>,
}

impl std::fmt::Debug for RoleCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RoleCache").field("entries", &self.len()).finish_non_exhaustive()
	}
}

impl RoleCache {
	pub fn new(reader: Arc<dyn RoleReader>) -> Self {
		Self {
			reader,
			entries: RwLock::new(FxHashMap::default()),
		}
	}

	/// Returns the orchestrator `delegator` is bonded to.
	pub async fn role_of(&self, delegator: Address) -> Result<Address, LookupError> {
		let cached = self.entries.read().get(&delegator).copied();
		if let Some(orchestrator) = cached {
			return Ok(orchestrator);
		}

		let orchestrator = self.reader.delegate_of(delegator).await?;
		self.entries.write().insert(delegator, orchestrator);
		tracing::debug!(%delegator, %orchestrator, "roles.cached");
		Ok(orchestrator)
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use hintd_ledger::MemoryLedger;

	use super::*;
	use crate::SourceError;

	fn addr(n: u8) -> Address {
		Address::new([n; 20])
	}

	#[tokio::test]
	async fn second_lookup_is_served_from_cache() {
		let ledger = Arc::new(MemoryLedger::new());
		ledger.set_delegate(addr(9), addr(1));
		let roles = RoleCache::new(ledger.clone());

		assert_eq!(roles.role_of(addr(9)).await.unwrap(), addr(1));
		assert_eq!(roles.role_of(addr(9)).await.unwrap(), addr(1));
		assert_eq!(ledger.role_reads(), 1);
	}

	#[tokio::test]
	async fn answers_are_never_invalidated() {
		let ledger = Arc::new(MemoryLedger::new());
		ledger.set_delegate(addr(9), addr(1));
		let roles = RoleCache::new(ledger.clone());
		roles.role_of(addr(9)).await.unwrap();

		ledger.set_delegate(addr(9), addr(2));
		assert_eq!(roles.role_of(addr(9)).await.unwrap(), addr(1));
	}

	#[tokio::test]
	async fn unbonded_delegator_is_cached_as_zero() {
		let ledger = Arc::new(MemoryLedger::new());
		let roles = RoleCache::new(ledger.clone());

		assert!(roles.role_of(addr(4)).await.unwrap().is_zero());
		assert!(roles.role_of(addr(4)).await.unwrap().is_zero());
		assert_eq!(ledger.role_reads(), 1);
	}

	#[tokio::test]
	async fn failures_are_not_cached() {
		let ledger = Arc::new(MemoryLedger::new());
		ledger.set_delegate(addr(9), addr(1));
		ledger.fail_role_reads(true);
		let roles = RoleCache::new(ledger.clone());

		assert!(matches!(
			roles.role_of(addr(9)).await,
			Err(LookupError::SourceUnavailable(SourceError::Read(_)))
		));
		assert!(roles.is_empty());

		ledger.fail_role_reads(false);
		assert_eq!(roles.role_of(addr(9)).await.unwrap(), addr(1));
		assert_eq!(ledger.role_reads(), 2);
	}
}
