//! HTTP surface for [`LookupService`](hintd_engine::LookupService).
//!
//! Two read-only routes, both `GET` with a single query parameter:
//!
//! * `/api/getHints?orchestrator=<addr>` answers `{"hints":{"prev":..,"next":..}}`
//! * `/api/getOrchestrator?delegator=<addr>` answers `{"orchestrator":..}`
//!
//! Failures answer `{"error": "..."}` with 400 for bad input, 404 for an
//! address outside the current pool, and 500 when the ledger cannot be read.
//!
//! The listener is a blocking [`tiny_http`] server drained by a dedicated
//! thread; each request is then handled on its own tokio task so concurrent
//! stale lookups reach the engine together and share one rebuild.

mod error;
mod routes;
mod server;

pub use error::{Result, ServeError};
pub use server::HttpServer;
