use std::sync::Arc;

use hintd_engine::EngineOptions;
use hintd_ledger::MemoryLedger;
use hintd_primitives::Address;
use pretty_assertions::assert_eq;

use super::*;

const A: &str = "0x00000000000000000000000000000000000000a1";
const B: &str = "0x00000000000000000000000000000000000000b2";
const C: &str = "0x00000000000000000000000000000000000000c3";
const ZERO: &str = "0x0000000000000000000000000000000000000000";
const DELEGATOR: &str = "0x00000000000000000000000000000000000000d1";

fn addr(raw: &str) -> Address {
	raw.parse().unwrap()
}

fn fixture() -> (Arc<MemoryLedger>, LookupService) {
	let ledger = Arc::new(MemoryLedger::with_pool(7, &[addr(A), addr(B), addr(C)]));
	ledger.set_delegate(addr(DELEGATOR), addr(B));
	let service = LookupService::from_ledger(ledger.clone(), EngineOptions::default());
	(ledger, service)
}

async fn get(service: &LookupService, target: &str) -> Reply {
	dispatch(service, &Method::Get, target).await
}

#[tokio::test]
async fn hints_for_middle_member() {
	let (_, service) = fixture();

	let reply = get(&service, &format!("/api/getHints?orchestrator={B}")).await;

	assert_eq!(reply, Reply::ok(json!({ "hints": { "prev": A, "next": C } })));
}

#[tokio::test]
async fn hints_accept_mixed_case_and_report_sentinel_ends() {
	let (_, service) = fixture();

	let reply = get(&service, "/api/getHints?orchestrator=0X00000000000000000000000000000000000000A1").await;

	assert_eq!(reply, Reply::ok(json!({ "hints": { "prev": ZERO, "next": B } })));
}

#[tokio::test]
async fn missing_or_blank_orchestrator_is_required_error() {
	let (ledger, service) = fixture();

	for target in ["/api/getHints", "/api/getHints?orchestrator=", "/api/getHints?orchestrator=%20%20"] {
		let reply = get(&service, target).await;
		assert_eq!(reply, Reply::error(400, ORCHESTRATOR_REQUIRED), "{target}");
	}
	assert_eq!(ledger.round_reads(), 0);
}

#[tokio::test]
async fn malformed_or_repeated_orchestrator_is_invalid() {
	let (ledger, service) = fixture();

	let malformed = get(&service, "/api/getHints?orchestrator=0x1234").await;
	let repeated = get(&service, &format!("/api/getHints?orchestrator={A}&orchestrator={B}")).await;

	assert_eq!(malformed, Reply::error(400, ORCHESTRATOR_INVALID));
	assert_eq!(repeated, Reply::error(400, ORCHESTRATOR_INVALID));
	assert_eq!(ledger.round_reads(), 0);
}

#[tokio::test]
async fn non_member_is_not_found() {
	let (_, service) = fixture();

	let reply = get(&service, &format!("/api/getHints?orchestrator={DELEGATOR}")).await;

	assert_eq!(reply, Reply::error(404, ORCHESTRATOR_NOT_IN_POOL));
}

#[tokio::test]
async fn ledger_failure_is_server_error_with_message() {
	let (ledger, service) = fixture();
	ledger.fail_round_reads(true);

	let reply = get(&service, &format!("/api/getHints?orchestrator={A}")).await;

	assert_eq!(reply.status, 500);
	let message = reply.body["error"].as_str().unwrap();
	assert!(message.starts_with("ledger unavailable"), "{message}");
}

#[tokio::test]
async fn orchestrator_of_delegator() {
	let (_, service) = fixture();

	let reply = get(&service, &format!("/api/getOrchestrator?delegator={DELEGATOR}")).await;

	assert_eq!(reply, Reply::ok(json!({ "orchestrator": B })));
}

#[tokio::test]
async fn orchestrator_input_errors() {
	let (ledger, service) = fixture();

	assert_eq!(
		get(&service, "/api/getOrchestrator").await,
		Reply::error(400, DELEGATOR_REQUIRED)
	);
	assert_eq!(
		get(&service, "/api/getOrchestrator?delegator=nope").await,
		Reply::error(400, DELEGATOR_INVALID)
	);
	assert_eq!(
		get(&service, &format!("/api/getOrchestrator?delegator={A}&delegator={A}")).await,
		Reply::error(400, DELEGATOR_INVALID)
	);
	assert_eq!(ledger.role_reads(), 0);
}

#[tokio::test]
async fn orchestrator_failure_uses_fixed_message() {
	let (ledger, service) = fixture();
	ledger.fail_role_reads(true);

	let reply = get(&service, &format!("/api/getOrchestrator?delegator={DELEGATOR}")).await;

	assert_eq!(reply, Reply::error(500, ROLE_FAILED));
}

#[tokio::test]
async fn unknown_path_and_wrong_method() {
	let (_, service) = fixture();

	assert_eq!(get(&service, "/api/other").await, Reply::error(404, "Not found."));
	assert_eq!(
		dispatch(&service, &Method::Post, "/api/getHints").await,
		Reply::error(405, "Method not allowed.")
	);
}

#[tokio::test]
async fn absolute_form_target_routes_by_path() {
	let (_, service) = fixture();

	let reply = get(&service, &format!("http://hints.example:3000/api/getHints?orchestrator={B}")).await;

	assert_eq!(reply, Reply::ok(json!({ "hints": { "prev": A, "next": C } })));
}

#[tokio::test]
async fn target_without_path_or_scheme_is_bad_request() {
	let (ledger, service) = fixture();

	for target in ["*", "api/getHints?orchestrator=0x00", "ftp://host/api/getHints"] {
		assert_eq!(get(&service, target).await, Reply::error(400, "Bad request."), "{target}");
	}
	assert_eq!(ledger.round_reads(), 0);
}
