//! Configuration module for the bundler system.
//!
//! This module provides structures and utilities for managing bundler
//! configuration. It supports loading configuration from TOML files with
//! `${ENV_VAR}` / `${ENV_VAR:-default}` substitution and provides validation
//! to ensure all required configuration values are properly set before the
//! pipeline starts.

use alloy_primitives::{Address, U256};
use bundler_types::SecretString;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when a referenced environment variable is not set.
	#[error("Missing configuration value: {0}")]
	Missing(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the bundler.
///
/// Contains all sections required for a submission run: the target chain,
/// the relay endpoint, signing keys, protocol contract addresses, the
/// signature domain, fee policy, and bid parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Target chain and node endpoint.
	pub chain: ChainConfig,
	/// Relay endpoint and retry budget.
	#[serde(default)]
	pub relay: RelayConfig,
	/// Signing keys for the two pipeline roles.
	pub accounts: AccountsConfig,
	/// Protocol contract addresses.
	pub contracts: ContractsConfig,
	/// EIP-712 domain parameters for operation signatures.
	#[serde(default)]
	pub signing_domain: SigningDomainConfig,
	/// Fee population policy for the opportunity transaction.
	#[serde(default)]
	pub fees: FeeConfig,
	/// Bond and bid amounts.
	pub bidding: BiddingConfig,
}

/// Target chain and node endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
	/// Expected chain id; the connected node must report the same value.
	pub id: u64,
	/// HTTP JSON-RPC endpoint of the chain node.
	pub rpc_url: String,
}

/// Relay endpoint and retry budget.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
	/// Bundle submission endpoint.
	#[serde(default = "default_relay_url")]
	pub url: String,
	/// Maximum submission attempts before giving up.
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	/// Fixed delay between attempts, in seconds.
	#[serde(default = "default_retry_delay_secs")]
	pub retry_delay_secs: u64,
	/// Per-request HTTP timeout for the relay client, in seconds.
	#[serde(default = "default_http_timeout_secs")]
	pub http_timeout_secs: u64,
}

impl Default for RelayConfig {
	fn default() -> Self {
		Self {
			url: default_relay_url(),
			max_attempts: default_max_attempts(),
			retry_delay_secs: default_retry_delay_secs(),
			http_timeout_secs: default_http_timeout_secs(),
		}
	}
}

/// Returns the default relay endpoint.
fn default_relay_url() -> String {
	"https://polygon-rpc.fastlane.xyz/".to_string()
}

/// Returns the default submission attempt budget.
fn default_max_attempts() -> u32 {
	3
}

/// Returns the default inter-attempt delay in seconds.
fn default_retry_delay_secs() -> u64 {
	5
}

/// Returns the default relay HTTP timeout in seconds.
fn default_http_timeout_secs() -> u64 {
	30
}

/// Signing keys for the two pipeline roles.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsConfig {
	/// Private key of the account that signs the opportunity transaction.
	pub opportunity_key: SecretString,
	/// Private key of the account that signs solver operations.
	pub solver_key: SecretString,
}

/// Protocol contract addresses on the target chain.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
	/// Entrypoint contract bundles execute through (also holds bonds).
	pub entrypoint: Address,
	/// Controlling dApp contract that derives operation identifiers.
	pub control: Address,
	/// Address authorized to sign operations for the controlling dApp.
	pub dapp_signer: Address,
	/// Contract that verifies operation signatures (EIP-712 domain member).
	pub verification: Address,
}

/// EIP-712 domain parameters for operation signatures.
#[derive(Debug, Clone, Deserialize)]
pub struct SigningDomainConfig {
	/// Domain name.
	#[serde(default = "default_domain_name")]
	pub name: String,
	/// Domain version.
	#[serde(default = "default_domain_version")]
	pub version: String,
}

impl Default for SigningDomainConfig {
	fn default() -> Self {
		Self {
			name: default_domain_name(),
			version: default_domain_version(),
		}
	}
}

/// Returns the default signing domain name.
fn default_domain_name() -> String {
	"AtlasVerification".to_string()
}

/// Returns the default signing domain version.
fn default_domain_version() -> String {
	"1.0".to_string()
}

/// Fee population policy for the opportunity transaction.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FeeConfig {
	/// Whether fees come from live estimation or static values.
	#[serde(default)]
	pub mode: FeeMode,
	/// Static maximum total fee per gas, in wei. Required in static mode.
	pub max_fee_per_gas: Option<u128>,
	/// Static maximum priority fee per gas, in wei. Required in static mode.
	pub max_priority_fee_per_gas: Option<u128>,
}

/// Fee population policy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
	/// Query the node's fee estimator at build time.
	#[default]
	Estimate,
	/// Use the configured static fee values.
	Static,
}

/// Bond and bid amounts, in wei.
#[derive(Debug, Clone, Deserialize)]
pub struct BiddingConfig {
	/// Minimum bonded balance the solver account must hold at the entrypoint.
	pub min_bond: U256,
	/// Bid attached to the solver operation.
	pub default_bid: U256,
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment variable references are resolved before parsing and the
	/// result is validated.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		content.parse()
	}

	/// Validates the configuration beyond what serde enforces.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.chain.id == 0 {
			return Err(ConfigError::Validation("chain.id must be non-zero".to_string()));
		}
		if self.chain.rpc_url.is_empty() {
			return Err(ConfigError::Missing("chain.rpc_url".to_string()));
		}
		if !self.relay.url.starts_with("http://") && !self.relay.url.starts_with("https://") {
			return Err(ConfigError::Validation(format!(
				"relay.url must be an HTTP(S) endpoint, got '{}'",
				self.relay.url
			)));
		}
		if self.relay.max_attempts == 0 {
			return Err(ConfigError::Validation(
				"relay.max_attempts must be at least 1".to_string(),
			));
		}
		if self.accounts.opportunity_key.is_empty() {
			return Err(ConfigError::Missing("accounts.opportunity_key".to_string()));
		}
		if self.accounts.solver_key.is_empty() {
			return Err(ConfigError::Missing("accounts.solver_key".to_string()));
		}
		if self.fees.mode == FeeMode::Static
			&& (self.fees.max_fee_per_gas.is_none() || self.fees.max_priority_fee_per_gas.is_none())
		{
			return Err(ConfigError::Validation(
				"static fee mode requires fees.max_fee_per_gas and fees.max_priority_fee_per_gas"
					.to_string(),
			));
		}
		if self.bidding.default_bid.is_zero() {
			return Err(ConfigError::Validation(
				"bidding.default_bid must be non-zero".to_string(),
			));
		}
		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

/// Resolves `${VAR}` and `${VAR:-default}` references against the process
/// environment.
///
/// A reference without a default whose variable is unset is an error; the
/// configuration cannot proceed with key material or endpoints missing.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).expect("capture group 0 always present");
		let var_name = cap.get(1).expect("variable name group always present").as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Missing(format!(
						"environment variable '{}' not set",
						var_name
					)))
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions.
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const FULL_CONFIG: &str = r#"
		[chain]
		id = 137
		rpc_url = "https://polygon.example/rpc"

		[relay]
		url = "https://relay.example/"
		max_attempts = 3
		retry_delay_secs = 5

		[accounts]
		opportunity_key = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"
		solver_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"

		[contracts]
		entrypoint = "0x4A394bD4Bc2f4309ac0b75c052b242ba3e0f32e0"
		control = "0x3e23e4282FcE0cF42DCd0E9bdf39056434E65C1F"
		dapp_signer = "0x96D501A4C52669283980dc5648EEC6437e2E6346"
		verification = "0xf31cf8740Dc4438Bb89a56Ee2234Ba9d5595c0E9"

		[bidding]
		min_bond = "1500000000000000000"
		default_bid = "100000000000000"
	"#;

	#[test]
	fn parses_full_config() {
		let config: Config = FULL_CONFIG.parse().unwrap();
		assert_eq!(config.chain.id, 137);
		assert_eq!(config.relay.max_attempts, 3);
		assert_eq!(config.fees.mode, FeeMode::Estimate);
		assert_eq!(config.signing_domain.name, "AtlasVerification");
		assert_eq!(config.signing_domain.version, "1.0");
		assert_eq!(
			config.bidding.min_bond,
			U256::from(1_500_000_000_000_000_000u128)
		);
	}

	#[test]
	fn relay_section_is_optional() {
		let stripped: String = FULL_CONFIG
			.lines()
			.skip_while(|l| !l.contains("[accounts]"))
			.collect::<Vec<_>>()
			.join("\n");
		let with_chain = format!(
			"[chain]\nid = 137\nrpc_url = \"https://polygon.example/rpc\"\n{}",
			stripped
		);
		let config: Config = with_chain.parse().unwrap();
		assert_eq!(config.relay.url, "https://polygon-rpc.fastlane.xyz/");
		assert_eq!(config.relay.max_attempts, 3);
		assert_eq!(config.relay.retry_delay_secs, 5);
	}

	#[test]
	fn env_vars_are_resolved() {
		std::env::set_var("BUNDLER_TEST_RPC", "https://node.example/rpc");
		let resolved =
			resolve_env_vars("rpc_url = \"${BUNDLER_TEST_RPC}\"\nurl = \"${BUNDLER_TEST_UNSET:-https://fallback.example/}\"")
				.unwrap();
		assert!(resolved.contains("https://node.example/rpc"));
		assert!(resolved.contains("https://fallback.example/"));
	}

	#[test]
	fn unset_env_var_without_default_is_an_error() {
		let err = resolve_env_vars("key = \"${BUNDLER_TEST_DEFINITELY_UNSET}\"").unwrap_err();
		assert!(matches!(err, ConfigError::Missing(_)));
	}

	#[test]
	fn static_mode_requires_both_fee_fields() {
		let config = format!("{}\n[fees]\nmode = \"static\"\nmax_fee_per_gas = 100000000000\n", FULL_CONFIG);
		let err = config.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn static_mode_with_both_fee_fields_parses() {
		let config = format!(
			"{}\n[fees]\nmode = \"static\"\nmax_fee_per_gas = 100000000000\nmax_priority_fee_per_gas = 30000000000\n",
			FULL_CONFIG
		);
		let config: Config = config.parse().unwrap();
		assert_eq!(config.fees.mode, FeeMode::Static);
		assert_eq!(config.fees.max_fee_per_gas, Some(100_000_000_000));
		assert_eq!(config.fees.max_priority_fee_per_gas, Some(30_000_000_000));
	}

	#[test]
	fn zero_attempt_budget_is_rejected() {
		let config = FULL_CONFIG.replace("max_attempts = 3", "max_attempts = 0");
		let err = config.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn loads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(FULL_CONFIG.as_bytes()).unwrap();
		let config = Config::from_file(file.path()).unwrap();
		assert_eq!(config.chain.id, 137);
	}
}
