use std::io::Cursor;

use hintd_engine::{LookupError, LookupService};
use hintd_primitives::AddressParseError;
use serde_json::{Value, json};
use tiny_http::{Header, Method, Response};
use tracing::warn;
use url::Url;

const ORCHESTRATOR_REQUIRED: &str = "Orchestrator address is required.";
const ORCHESTRATOR_INVALID: &str = "Invalid orchestrator address.";
const ORCHESTRATOR_NOT_IN_POOL: &str = "Orchestrator not found in the current pool.";
const DELEGATOR_REQUIRED: &str = "Delegator address is required.";
const DELEGATOR_INVALID: &str = "Invalid delegator address.";
const ROLE_FAILED: &str = "Failed to fetch orchestrator.";

/// Status and JSON body for one request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reply {
	pub status: u16,
	pub body: Value,
}

impl Reply {
	fn ok(body: Value) -> Self {
		Self { status: 200, body }
	}

	fn error(status: u16, message: impl Into<String>) -> Self {
		Self {
			status,
			body: json!({ "error": message.into() }),
		}
	}

	pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
		let response = Response::from_data(self.body.to_string().into_bytes()).with_status_code(self.status);
		match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
			Ok(header) => response.with_header(header),
			Err(()) => response,
		}
	}
}

/// Routes `target` as sent on the request line.
pub(crate) async fn dispatch(service: &LookupService, method: &Method, target: &str) -> Reply {
	let Some(url) = request_url(target) else {
		return Reply::error(400, "Bad request.");
	};

	match url.path() {
		"/api/getHints" | "/api/getOrchestrator" if *method != Method::Get => Reply::error(405, "Method not allowed."),
		"/api/getHints" => hints(service, &url).await,
		"/api/getOrchestrator" => orchestrator(service, &url).await,
		_ => Reply::error(404, "Not found."),
	}
}

async fn hints(service: &LookupService, url: &Url) -> Reply {
	let raw = match single_param(url, "orchestrator") {
		Param::Missing => return Reply::error(400, ORCHESTRATOR_REQUIRED),
		Param::Repeated => return Reply::error(400, ORCHESTRATOR_INVALID),
		Param::One(raw) => raw,
	};

	match service.get_hints(&raw).await {
		Ok(hints) => Reply::ok(json!({ "hints": hints })),
		Err(LookupError::InvalidInput(AddressParseError::Empty)) => Reply::error(400, ORCHESTRATOR_REQUIRED),
		Err(LookupError::InvalidInput(_)) => Reply::error(400, ORCHESTRATOR_INVALID),
		Err(LookupError::NotFound(_)) => Reply::error(404, ORCHESTRATOR_NOT_IN_POOL),
		Err(error @ LookupError::SourceUnavailable(_)) => {
			warn!(%error, "http.hints.failed");
			Reply::error(500, error.to_string())
		}
	}
}

async fn orchestrator(service: &LookupService, url: &Url) -> Reply {
	let raw = match single_param(url, "delegator") {
		Param::Missing => return Reply::error(400, DELEGATOR_REQUIRED),
		Param::Repeated => return Reply::error(400, DELEGATOR_INVALID),
		Param::One(raw) => raw,
	};

	match service.get_role(&raw).await {
		Ok(orchestrator) => Reply::ok(json!({ "orchestrator": orchestrator })),
		Err(LookupError::InvalidInput(AddressParseError::Empty)) => Reply::error(400, DELEGATOR_REQUIRED),
		Err(LookupError::InvalidInput(_)) => Reply::error(400, DELEGATOR_INVALID),
		Err(error) => {
			warn!(%error, "http.orchestrator.failed");
			Reply::error(500, ROLE_FAILED)
		}
	}
}

/// Accepts origin-form (`/path?query`) and absolute-form (`http://host/path?query`) targets.
fn request_url(target: &str) -> Option<Url> {
	if target.starts_with('/') {
		return Url::parse(&format!("http://localhost{target}")).ok();
	}
	Url::parse(target)
		.ok()
		.filter(|url| matches!(url.scheme(), "http" | "https"))
}

enum Param {
	Missing,
	Repeated,
	One(String),
}

fn single_param(url: &Url, key: &str) -> Param {
	let mut values = url
		.query_pairs()
		.filter(|(name, _)| name == key)
		.map(|(_, value)| value.into_owned());

	match (values.next(), values.next()) {
		(None, _) => Param::Missing,
		(Some(_), Some(_)) => Param::Repeated,
		(Some(value), None) if value.trim().is_empty() => Param::Missing,
		(Some(value), None) => Param::One(value),
	}
}

#[cfg(test)]
mod tests;
