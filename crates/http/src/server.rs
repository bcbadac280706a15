use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;

use hintd_engine::LookupService;
use tiny_http::{Request, Server};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::routes;
use crate::{Result, ServeError};

/// Requests accepted but not yet picked up by the async side.
const BACKLOG: usize = 64;

/// A bound, not yet serving, HTTP listener.
pub struct HttpServer {
	server: Arc<Server>,
	local_addr: SocketAddr,
}

impl std::fmt::Debug for HttpServer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HttpServer").field("local_addr", &self.local_addr).finish_non_exhaustive()
	}
}

impl HttpServer {
	/// Binds `addr`. Port 0 picks an ephemeral port; see [`Self::local_addr`].
	pub fn bind(addr: SocketAddr) -> Result<Self> {
		let server = Server::http(addr).map_err(|e| ServeError::Bind {
			addr,
			reason: e.to_string(),
		})?;
		let Some(local_addr) = server.server_addr().to_ip() else {
			return Err(ServeError::Bind {
				addr,
				reason: "unable to determine bound address".into(),
			});
		};

		Ok(Self {
			server: Arc::new(server),
			local_addr,
		})
	}

	pub fn local_addr(&self) -> SocketAddr {
		self.local_addr
	}

	/// Serves until `shutdown` is cancelled.
	///
	/// Requests still in flight at shutdown finish on their own tasks.
	pub async fn serve(self, service: LookupService, shutdown: CancellationToken) {
		let (tx, mut rx) = mpsc::channel::<Request>(BACKLOG);
		let receiver = self.server.clone();
		thread::spawn(move || {
			while let Ok(request) = receiver.recv() {
				if tx.blocking_send(request).is_err() {
					break;
				}
			}
		});

		info!(addr = %self.local_addr, "http.listen");
		loop {
			tokio::select! {
				_ = shutdown.cancelled() => break,
				maybe_req = rx.recv() => {
					let Some(request) = maybe_req else {
						break;
					};
					tokio::spawn(respond(service.clone(), request));
				}
			}
		}

		self.server.unblock();
		info!(addr = %self.local_addr, "http.shutdown");
	}
}

async fn respond(service: LookupService, request: Request) {
	let method = request.method().clone();
	let target = request.url().to_string();
	let reply = routes::dispatch(&service, &method, &target).await;
	debug!(%method, target, status = reply.status, "http.request");

	let response = reply.into_response();
	let _ = tokio::task::spawn_blocking(move || {
		if let Err(error) = request.respond(response) {
			debug!(%error, "http.respond.failed");
		}
	})
	.await;
}
