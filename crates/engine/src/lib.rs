//! Round-scoped hint cache.
//!
//! # Mental model
//!
//! * The transcoder pool is fixed for a round. [`HintEngine`] keeps one immutable
//!   [`PoolSnapshot`] tagged with the round it was built for.
//! * A lookup reads the current round. A matching snapshot answers directly,
//!   including negative answers. Anything else triggers a full traversal of the pool.
//! * Snapshots are published with one atomic swap after the traversal completes.
//!   Readers see the previous snapshot or the complete new one.
//! * Rebuilds are coalesced behind a gate: concurrent stale lookups share the
//!   outcome of whichever of them rebuilt first, success or failure.
//!
//! # Failure modes
//!
//! * Any failed read aborts the rebuild; nothing is published and the previous
//!   snapshot stays live.
//! * Malformed pools (cycles, more than `max_entries` members) and rebuilds
//!   exceeding `rebuild_timeout` fail the same way.
//! * Dropping a lookup mid-rebuild releases the gate without publishing.
//!
//! [`RoleCache`] is the unrelated delegator to orchestrator cache. It is not
//! round-scoped and never evicts. [`LookupService`] wraps both behind string
//! inputs for the transports.

mod engine;
mod error;
mod role;
mod service;
mod snapshot;

pub use engine::{EngineOptions, HintEngine};
pub use error::{LookupError, SourceError};
pub use role::RoleCache;
pub use service::LookupService;
pub use snapshot::{PoolSnapshot, SnapshotBuilder};
