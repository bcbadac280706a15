//! Snapshot container with coalesced, all-or-nothing rebuilds.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use hintd_ledger::RegistryReader;
use hintd_primitives::{Address, HintPair, Round};
use tokio::sync::Mutex;

use crate::{LookupError, PoolSnapshot, SnapshotBuilder, SourceError};

/// Rebuild bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
	/// Upper bound on one full traversal, round read included.
	pub rebuild_timeout: Duration,
	/// Largest pool accepted before the traversal is treated as malformed.
	pub max_entries: usize,
}

impl Default for EngineOptions {
	fn default() -> Self {
		Self {
			rebuild_timeout: Duration::from_secs(120),
			max_entries: 10_000,
		}
	}
}

/// Outcome of the last rebuild that ran to completion.
type Attempt = Result<Arc<PoolSnapshot>, SourceError>;

/// Round-scoped pool cache.
///
/// Holds at most one published [`PoolSnapshot`]. Readers load it without
/// locking; rebuilders serialize on `rebuild_gate` and publish with one store.
/// The gate keeps the last finished attempt so callers that queued behind it
/// share its outcome, failures included.
pub struct HintEngine {
	reader: Arc<dyn RegistryReader>,
	published: ArcSwapOption<PoolSnapshot>,
	rebuild_gate: Mutex<Option<Attempt>>,
	/// Finished attempts. Only advanced while `rebuild_gate` is held.
	attempts: AtomicU64,
	rebuilds: AtomicU64,
	options: EngineOptions,
}

impl std::fmt::Debug for HintEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HintEngine")
			.field("round", &self.current().map(|snapshot| snapshot.round()))
			.field("rebuilds", &self.rebuilds.load(Ordering::Relaxed))
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

impl HintEngine {
	pub fn new(reader: Arc<dyn RegistryReader>, options: EngineOptions) -> Self {
		Self {
			reader,
			published: ArcSwapOption::empty(),
			rebuild_gate: Mutex::new(None),
			attempts: AtomicU64::new(0),
			rebuilds: AtomicU64::new(0),
			options,
		}
	}

	pub fn options(&self) -> EngineOptions {
		self.options
	}

	/// Returns the published snapshot without touching the ledger.
	pub fn current(&self) -> Option<Arc<PoolSnapshot>> {
		self.published.load_full()
	}

	/// Number of snapshots this engine has published.
	pub fn rebuilds(&self) -> u64 {
		self.rebuilds.load(Ordering::Relaxed)
	}

	/// Returns the neighbours of `entry` in the current round's pool.
	///
	/// A miss against a snapshot already built for the current round is
	/// [`LookupError::NotFound`] and does not rebuild.
	pub async fn lookup(&self, entry: Address) -> Result<HintPair, LookupError> {
		let observed = self.reader.current_round().await?;

		let published = self.published.load_full();
		let snapshot = match published {
			Some(snapshot) if snapshot.round() == observed => snapshot,
			stale => self.refresh(observed, stale).await?,
		};

		snapshot.get(entry).ok_or(LookupError::NotFound(entry))
	}

	/// Rebuilds unless another caller finished a rebuild while this one waited
	/// on the gate.
	///
	/// An attempt that finished during the wait is shared: its error as is, its
	/// snapshot when tagged at or past `observed`. `stale` is the snapshot the
	/// caller rejected; a different published snapshot at or past `observed`
	/// is shared too.
	async fn refresh(&self, observed: Round, stale: Option<Arc<PoolSnapshot>>) -> Result<Arc<PoolSnapshot>, SourceError> {
		let seen = self.attempts.load(Ordering::Acquire);
		let mut gate = self.rebuild_gate.lock().await;

		if self.attempts.load(Ordering::Acquire) != seen {
			match gate.as_ref() {
				Some(Err(error)) => {
					tracing::debug!(%error, %observed, "hints.rebuild.shared_failure");
					return Err(error.clone());
				}
				Some(Ok(snapshot)) if snapshot.round() >= observed => {
					tracing::debug!(round = %snapshot.round(), %observed, "hints.rebuild.coalesced");
					return Ok(snapshot.clone());
				}
				_ => {}
			}
		}

		if let Some(latest) = self.published.load_full()
			&& !stale.as_ref().is_some_and(|stale| Arc::ptr_eq(stale, &latest))
			&& latest.round() >= observed
		{
			tracing::debug!(round = %latest.round(), %observed, "hints.rebuild.coalesced");
			return Ok(latest);
		}

		let attempt = self.rebuild().await.map(Arc::new);
		if let Ok(snapshot) = &attempt {
			self.published.store(Some(snapshot.clone()));
			self.rebuilds.fetch_add(1, Ordering::Relaxed);
		}
		*gate = Some(attempt.clone());
		self.attempts.fetch_add(1, Ordering::Release);
		attempt
	}

	async fn rebuild(&self) -> Result<PoolSnapshot, SourceError> {
		let started = Instant::now();
		let timeout = self.options.rebuild_timeout;

		let result = tokio::time::timeout(timeout, self.traverse())
			.await
			.unwrap_or(Err(SourceError::TimedOut(timeout)));

		match &result {
			Ok(snapshot) => tracing::info!(
				round = %snapshot.round(),
				entries = snapshot.len(),
				elapsed_ms = started.elapsed().as_millis() as u64,
				"hints.rebuild.done"
			),
			Err(error) => tracing::warn!(
				error = %error,
				elapsed_ms = started.elapsed().as_millis() as u64,
				"hints.rebuild.failed"
			),
		}
		result
	}

	/// Walks the pool front to back. The snapshot is tagged with the round read
	/// before the first traversal call.
	async fn traverse(&self) -> Result<PoolSnapshot, SourceError> {
		let round = self.reader.current_round().await?;
		tracing::debug!(%round, "hints.rebuild.start");

		let mut builder = SnapshotBuilder::new(self.options.max_entries);
		let mut next = self.reader.first_entry().await?;
		while !next.is_zero() {
			builder.push(next)?;
			next = self.reader.next_entry(next).await?;
		}

		Ok(builder.finish(round))
	}
}
