//! Hint daemon.
//!
//! Reads the transcoder pool from the chain through a JSON-RPC node, keeps a
//! round-scoped copy of it in memory, and answers prev/next hint and
//! delegator-to-orchestrator lookups over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hintd_config::{Config, Overrides};
use hintd_engine::{EngineOptions, LookupService};
use hintd_http::HttpServer;
use hintd_ledger::{Contracts, RpcLedger};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "hintd")]
#[command(about = "Serves transcoder pool hints over HTTP")]
struct Args {
	/// TOML config file
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Listen address, overrides `server.bind`
	#[arg(short, long, value_name = "ADDR")]
	bind: Option<SocketAddr>,

	/// JSON-RPC endpoint, overrides `RPC_URL` and `rpc.url`
	#[arg(long, value_name = "URL")]
	rpc_url: Option<String>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let config = Config::resolve(
		args.config.as_deref(),
		|key| std::env::var(key).ok(),
		Overrides {
			rpc_url: args.rpc_url,
			bind: args.bind,
		},
	)?;
	let ledger = RpcLedger::new(
		config.rpc_url()?,
		Contracts {
			bonding_manager: config.contracts.bonding_manager,
			rounds_manager: config.contracts.rounds_manager,
		},
		config.request_timeout(),
	)?;
	info!(
		rpc = %ledger.endpoint(),
		bonding_manager = %ledger.contracts().bonding_manager,
		rounds_manager = %ledger.contracts().rounds_manager,
		"hintd.ledger"
	);
	let service = LookupService::from_ledger(
		Arc::new(ledger),
		EngineOptions {
			rebuild_timeout: config.rebuild_timeout(),
			max_entries: config.cache.max_entries,
		},
	);

	let server = HttpServer::bind(config.server.bind)?;
	let shutdown = CancellationToken::new();
	tokio::spawn(cancel_on_interrupt(shutdown.clone()));

	server.serve(service, shutdown).await;
	Ok(())
}

async fn cancel_on_interrupt(shutdown: CancellationToken) {
	match tokio::signal::ctrl_c().await {
		Ok(()) => {
			info!("hintd.interrupt");
			shutdown.cancel();
		}
		Err(error) => warn!(%error, "hintd.signal.unavailable"),
	}
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::fmt::format::FmtSpan;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("warn,hintd=debug")
			} else {
				EnvFilter::new("warn,hintd=info")
			}
		})
	};

	if let Some(log_dir) = std::env::var("HINTD_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("hintd.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_span_events(FmtSpan::CLOSE)
				.with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			info!(path = ?log_path, "hintd.tracing.file");
			return;
		}
	}

	tracing_subscriber::fmt().with_env_filter(filter()).init();
}
