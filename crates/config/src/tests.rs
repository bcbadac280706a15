use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

fn no_env(_: &str) -> Option<String> {
	None
}

#[test]
fn defaults_match_arbitrum_deployment() {
	let config = Config::default();

	assert_eq!(config.rpc.url, "https://arb1.arbitrum.io/rpc");
	assert_eq!(
		config.contracts.bonding_manager,
		"0x35Bcf3c30594191d53231E4FF333E8A770453e40".parse().unwrap()
	);
	assert_eq!(
		config.contracts.rounds_manager,
		"0xdd6f56DcC28D3F5f27084381fE8Df634985cc39f".parse().unwrap()
	);
	assert_eq!(config.server.bind.to_string(), "127.0.0.1:3000");
	assert!(config.validate().is_ok());
}

#[test]
fn partial_file_keeps_other_defaults() {
	let config = Config::parse(
		r#"
		[cache]
		max_entries = 50

		[server]
		bind = "0.0.0.0:8080"
		"#,
	)
	.unwrap();

	assert_eq!(config.cache.max_entries, 50);
	assert_eq!(config.cache.rebuild_timeout_ms, 120_000);
	assert_eq!(config.server.bind.to_string(), "0.0.0.0:8080");
	assert_eq!(config.rpc, RpcConfig::default());
}

#[test]
fn unknown_keys_and_bad_addresses_are_parse_errors() {
	assert!(matches!(Config::parse("[rpc]\nendpoint = \"x\""), Err(ConfigError::Parse(_))));
	assert!(matches!(
		Config::parse("[contracts]\nbonding_manager = \"0x1234\""),
		Err(ConfigError::Parse(_))
	));
}

#[test]
fn loads_from_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "[rpc]\nurl = \"http://localhost:8545\"\nrequest_timeout_ms = 500").unwrap();

	let config = Config::load(file.path()).unwrap();
	assert_eq!(config.rpc_url().unwrap().as_str(), "http://localhost:8545/");
	assert_eq!(config.request_timeout(), Duration::from_millis(500));
}

#[test]
fn missing_file_is_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.toml");

	match Config::load(&path) {
		Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("expected I/O error, got {other:?}"),
	}
}

#[test]
fn env_overrides_file_and_flags_override_env() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "[rpc]\nurl = \"http://file:8545\"").unwrap();

	let env = |key: &str| (key == RPC_URL_ENV).then(|| "http://env:8545".to_string());

	let from_env = Config::resolve(Some(file.path()), env, Overrides::default()).unwrap();
	assert_eq!(from_env.rpc.url, "http://env:8545");

	let from_flags = Config::resolve(
		Some(file.path()),
		env,
		Overrides {
			rpc_url: Some("http://flag:8545".into()),
			bind: Some("127.0.0.1:9000".parse().unwrap()),
		},
	)
	.unwrap();
	assert_eq!(from_flags.rpc.url, "http://flag:8545");
	assert_eq!(from_flags.server.bind.port(), 9000);
}

#[test]
fn blank_env_value_is_ignored() {
	let env = |_: &str| Some("  ".to_string());
	let config = Config::resolve(None, env, Overrides::default()).unwrap();
	assert_eq!(config.rpc.url, DEFAULT_RPC_URL);
}

#[test]
fn validation_rejects_unusable_values() {
	let bad_scheme = Overrides {
		rpc_url: Some("ws://localhost:8546".into()),
		..Overrides::default()
	};
	assert!(matches!(Config::resolve(None, no_env, bad_scheme), Err(ConfigError::Invalid(_))));

	let not_a_url = Overrides {
		rpc_url: Some("not a url".into()),
		..Overrides::default()
	};
	assert!(matches!(Config::resolve(None, no_env, not_a_url), Err(ConfigError::Invalid(_))));

	let mut config = Config::default();
	config.cache.max_entries = 0;
	assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

	let mut config = Config::default();
	config.cache.rebuild_timeout_ms = 0;
	assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

	let mut config = Config::default();
	config.rpc.request_timeout_ms = 0;
	assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}
