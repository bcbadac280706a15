//! String-facing lookup surface shared by every transport.

use std::sync::Arc;

use hintd_ledger::{RegistryReader, RoleReader};
use hintd_primitives::{Address, HintPair};

use crate::{EngineOptions, HintEngine, LookupError, RoleCache};

/// One hint engine and one role cache behind address-string inputs.
///
/// Cloning shares the same engine and cache.
#[derive(Debug, Clone)]
pub struct LookupService {
	engine: Arc<HintEngine>,
	roles: Arc<RoleCache>,
}

impl LookupService {
	pub fn new(engine: Arc<HintEngine>, roles: Arc<RoleCache>) -> Self {
		Self { engine, roles }
	}

	/// Builds both caches over one ledger.
	pub fn from_ledger<L>(ledger: Arc<L>, options: EngineOptions) -> Self
	where
		L: RegistryReader + RoleReader,
	{
		let engine = HintEngine::new(ledger.clone(), options);
		let roles = RoleCache::new(ledger);
		Self::new(Arc::new(engine), Arc::new(roles))
	}

	pub fn engine(&self) -> &HintEngine {
		&self.engine
	}

	pub fn roles(&self) -> &RoleCache {
		&self.roles
	}

	/// Hints for the orchestrator spelled by `raw`.
	pub async fn get_hints(&self, raw: &str) -> Result<HintPair, LookupError> {
		let orchestrator: Address = raw.parse()?;
		self.engine.lookup(orchestrator).await
	}

	/// Orchestrator of the delegator spelled by `raw`.
	pub async fn get_role(&self, raw: &str) -> Result<Address, LookupError> {
		let delegator: Address = raw.parse()?;
		self.roles.role_of(delegator).await
	}
}
