//! Configuration for the hint service.
//!
//! Values are layered, lowest precedence first:
//!
//! 1. Built-in defaults (the Arbitrum One deployment).
//! 2. A TOML file passed with `--config`.
//! 3. The `RPC_URL` environment variable.
//! 4. Command-line [`Overrides`].
//!
//! Every section and key is optional:
//!
//! ```toml
//! [rpc]
//! url = "https://arb1.arbitrum.io/rpc"
//! request_timeout_ms = 10000
//!
//! [contracts]
//! bonding_manager = "0x35Bcf3c30594191d53231E4FF333E8A770453e40"
//! rounds_manager = "0xdd6f56DcC28D3F5f27084381fE8Df634985cc39f"
//!
//! [cache]
//! rebuild_timeout_ms = 120000
//! max_entries = 10000
//!
//! [server]
//! bind = "127.0.0.1:3000"
//! ```

pub mod error;

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

pub use error::{ConfigError, Result};
use hintd_primitives::Address;
use serde::Deserialize;
use url::Url;

/// Environment variable overriding `rpc.url`.
pub const RPC_URL_ENV: &str = "RPC_URL";

const DEFAULT_RPC_URL: &str = "https://arb1.arbitrum.io/rpc";
const BONDING_MANAGER: Address = Address::new([
	0x35, 0xbc, 0xf3, 0xc3, 0x05, 0x94, 0x19, 0x1d, 0x53, 0x23, 0x1e, 0x4f, 0xf3, 0x33, 0xe8, 0xa7, 0x70, 0x45, 0x3e, 0x40,
]);
const ROUNDS_MANAGER: Address = Address::new([
	0xdd, 0x6f, 0x56, 0xdc, 0xc2, 0x8d, 0x3f, 0x5f, 0x27, 0x08, 0x43, 0x81, 0xfe, 0x8d, 0xf6, 0x34, 0x98, 0x5c, 0xc3, 0x9f,
]);

/// Fully resolved service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub rpc: RpcConfig,
	pub contracts: ContractsConfig,
	pub cache: CacheConfig,
	pub server: ServerConfig,
}

/// JSON-RPC endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RpcConfig {
	pub url: String,
	pub request_timeout_ms: u64,
}

impl Default for RpcConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_RPC_URL.to_string(),
			request_timeout_ms: 10_000,
		}
	}
}

/// Contract deployment addresses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractsConfig {
	pub bonding_manager: Address,
	pub rounds_manager: Address,
}

impl Default for ContractsConfig {
	fn default() -> Self {
		Self {
			bonding_manager: BONDING_MANAGER,
			rounds_manager: ROUNDS_MANAGER,
		}
	}
}

/// Pool cache bounds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
	pub rebuild_timeout_ms: u64,
	pub max_entries: usize,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			rebuild_timeout_ms: 120_000,
			max_entries: 10_000,
		}
	}
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
	pub bind: SocketAddr,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
		}
	}
}

/// Command-line overrides; `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	pub rpc_url: Option<String>,
	pub bind: Option<SocketAddr>,
}

impl Config {
	/// Parse a TOML string on top of the defaults.
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Read and parse a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&input)
	}

	/// Layers file, environment, and overrides, then validates the result.
	///
	/// `env` looks up environment variables; pass `|key| std::env::var(key).ok()`.
	pub fn resolve(path: Option<&Path>, env: impl Fn(&str) -> Option<String>, overrides: Overrides) -> Result<Self> {
		let mut config = match path {
			Some(path) => Self::load(path)?,
			None => Self::default(),
		};

		if let Some(url) = env(RPC_URL_ENV).filter(|url| !url.trim().is_empty()) {
			config.rpc.url = url;
		}
		if let Some(url) = overrides.rpc_url {
			config.rpc.url = url;
		}
		if let Some(bind) = overrides.bind {
			config.server.bind = bind;
		}

		config.validate()?;
		Ok(config)
	}

	/// Rejects values the service cannot run with.
	pub fn validate(&self) -> Result<()> {
		self.rpc_url()?;
		if self.rpc.request_timeout_ms == 0 {
			return Err(ConfigError::Invalid("rpc.request_timeout_ms must be positive".into()));
		}
		if self.cache.rebuild_timeout_ms == 0 {
			return Err(ConfigError::Invalid("cache.rebuild_timeout_ms must be positive".into()));
		}
		if self.cache.max_entries == 0 {
			return Err(ConfigError::Invalid("cache.max_entries must be positive".into()));
		}
		Ok(())
	}

	/// The RPC endpoint as an http(s) URL.
	pub fn rpc_url(&self) -> Result<Url> {
		let url = Url::parse(self.rpc.url.trim())
			.map_err(|e| ConfigError::Invalid(format!("rpc.url {:?}: {e}", self.rpc.url)))?;
		match url.scheme() {
			"http" | "https" => Ok(url),
			other => Err(ConfigError::Invalid(format!("rpc.url scheme must be http or https, got {other}"))),
		}
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.rpc.request_timeout_ms)
	}

	pub fn rebuild_timeout(&self) -> Duration {
		Duration::from_millis(self.cache.rebuild_timeout_ms)
	}
}

#[cfg(test)]
mod tests;
