//! In-process ledger with scriptable failures.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hintd_primitives::{Address, Round};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::watch;

use crate::{ReadError, RegistryReader, Result, RoleReader};

#[derive(Debug)]
struct State {
	round: Round,
	queued_rounds: VecDeque<Round>,
	head: Address,
	links: FxHashMap<Address, Address>,
	delegates: FxHashMap<Address, Address>,
	fail_traversal_at: Option<usize>,
	fail_rounds: bool,
	fail_roles: bool,
	delay: Option<Duration>,
}

/// Ledger held entirely in memory.
///
/// The pool is stored as a forward-linked list so malformed pools (cycles,
/// dangling links) can be scripted as well as well-formed ones. Read counters
/// let callers assert how many remote reads a code path would have issued.
#[derive(Debug)]
pub struct MemoryLedger {
	state: Mutex<State>,
	paused: watch::Sender<bool>,
	round_reads: AtomicUsize,
	traversals: AtomicUsize,
	traversal_reads: AtomicUsize,
	role_reads: AtomicUsize,
}

impl Default for MemoryLedger {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryLedger {
	/// Creates an empty ledger at round 0.
	pub fn new() -> Self {
		let (paused, _) = watch::channel(false);
		Self {
			state: Mutex::new(State {
				round: Round(0),
				queued_rounds: VecDeque::new(),
				head: Address::ZERO,
				links: FxHashMap::default(),
				delegates: FxHashMap::default(),
				fail_traversal_at: None,
				fail_rounds: false,
				fail_roles: false,
				delay: None,
			}),
			paused,
			round_reads: AtomicUsize::new(0),
			traversals: AtomicUsize::new(0),
			traversal_reads: AtomicUsize::new(0),
			role_reads: AtomicUsize::new(0),
		}
	}

	/// Creates a ledger holding `pool` at `round`.
	pub fn with_pool(round: u64, pool: &[Address]) -> Self {
		let ledger = Self::new();
		ledger.set_round(round);
		ledger.set_pool(pool);
		ledger
	}

	pub fn set_round(&self, round: u64) {
		self.state.lock().round = Round(round);
	}

	/// Makes the next round reads return `rounds` in order. The last one stays current.
	pub fn queue_rounds(&self, rounds: &[u64]) {
		self.state.lock().queued_rounds.extend(rounds.iter().copied().map(Round));
	}

	/// Replaces the pool with `pool` in traversal order.
	pub fn set_pool(&self, pool: &[Address]) {
		let mut links = FxHashMap::default();
		for (i, entry) in pool.iter().enumerate() {
			links.insert(*entry, pool.get(i + 1).copied().unwrap_or(Address::ZERO));
		}
		let mut state = self.state.lock();
		state.head = pool.first().copied().unwrap_or(Address::ZERO);
		state.links = links;
	}

	/// Replaces the pool with raw `(entry, next)` links starting at `head`.
	pub fn set_links(&self, head: Address, links: &[(Address, Address)]) {
		let mut state = self.state.lock();
		state.head = head;
		state.links = links.iter().copied().collect();
	}

	pub fn set_delegate(&self, delegator: Address, orchestrator: Address) {
		self.state.lock().delegates.insert(delegator, orchestrator);
	}

	/// Makes the `nth` traversal read from now (1-based) fail once.
	pub fn fail_traversal_read(&self, nth: usize) {
		let at = self.traversal_reads.load(Ordering::SeqCst) + nth;
		self.state.lock().fail_traversal_at = Some(at);
	}

	pub fn fail_round_reads(&self, fail: bool) {
		self.state.lock().fail_rounds = fail;
	}

	pub fn fail_role_reads(&self, fail: bool) {
		self.state.lock().fail_roles = fail;
	}

	/// Delays every traversal read by `delay`.
	pub fn set_traversal_delay(&self, delay: Option<Duration>) {
		self.state.lock().delay = delay;
	}

	/// Holds new and waiting traversals at their first read until resumed.
	pub fn pause_traversals(&self) {
		self.paused.send_replace(true);
	}

	pub fn resume_traversals(&self) {
		self.paused.send_replace(false);
	}

	/// Number of round reads issued.
	pub fn round_reads(&self) -> usize {
		self.round_reads.load(Ordering::SeqCst)
	}

	/// Number of traversals started (`first_entry` calls).
	pub fn traversals(&self) -> usize {
		self.traversals.load(Ordering::SeqCst)
	}

	/// Number of `first_entry` plus `next_entry` reads that reached the pool.
	pub fn traversal_reads(&self) -> usize {
		self.traversal_reads.load(Ordering::SeqCst)
	}

	pub fn role_reads(&self) -> usize {
		self.role_reads.load(Ordering::SeqCst)
	}

	async fn traversal_read(&self, read: impl FnOnce(&State) -> Result<Address> + Send) -> Result<Address> {
		let n = self.traversal_reads.fetch_add(1, Ordering::SeqCst) + 1;

		let delay = self.state.lock().delay;
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}

		let mut state = self.state.lock();
		if state.fail_traversal_at == Some(n) {
			state.fail_traversal_at = None;
			return Err(ReadError::Transport(format!("injected failure on traversal read {n}")));
		}
		read(&state)
	}
}

#[async_trait]
impl RegistryReader for MemoryLedger {
	async fn current_round(&self) -> Result<Round> {
		self.round_reads.fetch_add(1, Ordering::SeqCst);
		let mut state = self.state.lock();
		if state.fail_rounds {
			return Err(ReadError::Transport("injected round read failure".into()));
		}
		if let Some(round) = state.queued_rounds.pop_front() {
			state.round = round;
		}
		Ok(state.round)
	}

	async fn first_entry(&self) -> Result<Address> {
		self.traversals.fetch_add(1, Ordering::SeqCst);
		let mut paused = self.paused.subscribe();
		let _ = paused.wait_for(|paused| !*paused).await;

		self.traversal_read(|state| Ok(state.head)).await
	}

	async fn next_entry(&self, entry: Address) -> Result<Address> {
		self.traversal_read(move |state| state.links.get(&entry).copied().ok_or(ReadError::UnknownEntry(entry)))
			.await
	}
}

#[async_trait]
impl RoleReader for MemoryLedger {
	async fn delegate_of(&self, delegator: Address) -> Result<Address> {
		self.role_reads.fetch_add(1, Ordering::SeqCst);
		let state = self.state.lock();
		if state.fail_roles {
			return Err(ReadError::Transport("injected role read failure".into()));
		}
		Ok(state.delegates.get(&delegator).copied().unwrap_or(Address::ZERO))
	}
}
