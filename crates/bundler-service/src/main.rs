//! Main entry point for the bundler service.
//!
//! This binary runs the bundle pipeline once: it builds a signed opportunity
//! transaction, derives its operation identifier from the control contract,
//! signs the companion solver operation, and submits the pair to the relay
//! with retries and an on-chain safety-net broadcast.

use bundler_account::AccountService;
use bundler_chain::AlloyChain;
use bundler_config::Config;
use bundler_core::BundlePipeline;
use bundler_relay::HttpRelay;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Command-line arguments for the bundler service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the bundler service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Wires the chain, relay, and account services
/// 5. Runs the pipeline once and reports the outcome
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	tracing::info!("Started bundler");

	// Load configuration
	let config = Config::from_file(&args.config)?;
	tracing::info!(chain_id = config.chain.id, relay = %config.relay.url, "Loaded configuration");

	// Wire external services
	let chain = Arc::new(AlloyChain::connect(&config.chain.rpc_url)?);
	let relay = Arc::new(HttpRelay::new(
		&config.relay.url,
		Duration::from_secs(config.relay.http_timeout_secs),
	)?);
	let accounts = Arc::new(AccountService::from_secrets(
		&config.accounts.opportunity_key,
		&config.accounts.solver_key,
	)?);

	// Run the pipeline once
	let pipeline = BundlePipeline::new(config, chain, relay, accounts);
	match pipeline.run().await {
		Ok(()) => {
			tracing::info!("Bundle accepted");
			Ok(())
		}
		Err(err) => {
			tracing::error!(error = %err, "Bundle submission failed");
			Err(err.into())
		}
	}
}
