//! Ethereum JSON-RPC implementation of the ledger readers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hintd_primitives::{Address, Round};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use url::Url;

use crate::abi::{self, CURRENT_ROUND, DELEGATE_ADDRESS_WORD, FIRST_TRANSCODER, GET_DELEGATOR, NEXT_TRANSCODER};
use crate::{ReadError, RegistryReader, Result, RoleReader};

/// Deployed addresses of the contracts the service reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contracts {
	/// Owns the transcoder pool and delegator records.
	pub bonding_manager: Address,
	/// Owns the round counter.
	pub rounds_manager: Address,
}

#[derive(Deserialize)]
struct RpcResponse {
	#[serde(default)]
	result: Option<String>,
	#[serde(default)]
	error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
	code: i64,
	#[serde(default)]
	message: String,
}

/// JSON-RPC backed ledger reader.
///
/// Every read is one `eth_call` against the `latest` block.
#[derive(Debug)]
pub struct RpcLedger {
	client: Client,
	endpoint: Url,
	contracts: Contracts,
	next_id: AtomicU64,
}

impl RpcLedger {
	/// Creates a reader for `endpoint` with a per-request timeout.
	pub fn new(endpoint: Url, contracts: Contracts, request_timeout: Duration) -> Result<Self> {
		let client = Client::builder()
			.timeout(request_timeout)
			.build()
			.map_err(|e| ReadError::Transport(e.to_string()))?;

		Ok(Self {
			client,
			endpoint,
			contracts,
			next_id: AtomicU64::new(1),
		})
	}

	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	pub fn contracts(&self) -> Contracts {
		self.contracts
	}

	async fn eth_call(&self, to: Address, data: String) -> Result<Vec<u8>> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		tracing::trace!(id, %to, data = %data, "ledger.eth_call");

		let body = serde_json::json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": "eth_call",
			"params": [{ "to": to.to_string(), "data": data }, "latest"],
		});

		let response = self
			.client
			.post(self.endpoint.clone())
			.header(CONTENT_TYPE, "application/json")
			.json(&body)
			.send()
			.await
			.map_err(|e| ReadError::Transport(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(ReadError::Status { status: status.as_u16() });
		}

		let reply: RpcResponse = response
			.json()
			.await
			.map_err(|e| ReadError::Decode(format!("invalid JSON-RPC body: {e}")))?;

		if let Some(error) = reply.error {
			return Err(ReadError::Rpc {
				code: error.code,
				message: error.message,
			});
		}

		let result = reply
			.result
			.ok_or_else(|| ReadError::Decode("JSON-RPC reply has neither result nor error".into()))?;
		abi::decode_hex(&result)
	}
}

#[async_trait]
impl RegistryReader for RpcLedger {
	async fn current_round(&self) -> Result<Round> {
		let data = self.eth_call(self.contracts.rounds_manager, abi::encode_call(CURRENT_ROUND, &[])).await?;
		abi::u64_at(&data, 0).map(Round)
	}

	async fn first_entry(&self) -> Result<Address> {
		let data = self
			.eth_call(self.contracts.bonding_manager, abi::encode_call(FIRST_TRANSCODER, &[]))
			.await?;
		abi::address_at(&data, 0)
	}

	async fn next_entry(&self, entry: Address) -> Result<Address> {
		let data = self
			.eth_call(self.contracts.bonding_manager, abi::encode_call(NEXT_TRANSCODER, &[entry]))
			.await?;
		abi::address_at(&data, 0)
	}
}

#[async_trait]
impl RoleReader for RpcLedger {
	async fn delegate_of(&self, delegator: Address) -> Result<Address> {
		let data = self
			.eth_call(self.contracts.bonding_manager, abi::encode_call(GET_DELEGATOR, &[delegator]))
			.await?;
		abi::address_at(&data, DELEGATE_ADDRESS_WORD)
	}
}
