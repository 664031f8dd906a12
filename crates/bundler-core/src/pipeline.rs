//! End-to-end bundle pipeline.
//!
//! Wires the stage components together over shared chain and relay handles:
//! network verification and bond maintenance up front, then transaction
//! build, identifier correlation, operation signing, bundle assembly, and
//! relay submission, strictly in that order. Each stage hands an immutable
//! value to the next; the chain and relay handles are the only shared state.

use crate::bond::BondManager;
use crate::correlator::HashCorrelator;
use crate::error::PipelineError;
use crate::operation::OperationSigner;
use crate::submitter::RelaySubmitter;
use crate::transaction::TransactionBuilder;
use bundler_account::AccountService;
use bundler_chain::ChainInterface;
use bundler_config::Config;
use bundler_relay::{RelayInterface, RetryPolicy};
use bundler_types::{operation_domain, Bundle};
use std::sync::Arc;
use std::time::Duration;

/// The bundle construction and submission pipeline.
///
/// Constructed once by the caller with explicit chain and relay handles, so
/// tests can substitute doubles for either side.
pub struct BundlePipeline {
	config: Config,
	chain: Arc<dyn ChainInterface>,
	relay: Arc<dyn RelayInterface>,
	accounts: Arc<AccountService>,
}

impl BundlePipeline {
	/// Creates a pipeline over the given external service handles.
	pub fn new(
		config: Config,
		chain: Arc<dyn ChainInterface>,
		relay: Arc<dyn RelayInterface>,
		accounts: Arc<AccountService>,
	) -> Self {
		Self {
			config,
			chain,
			relay,
			accounts,
		}
	}

	/// Verifies the connected node serves the configured chain.
	pub async fn verify_network(&self) -> Result<(), PipelineError> {
		let actual = self.chain.chain_id().await?;
		if actual != self.config.chain.id {
			return Err(PipelineError::NetworkMismatch {
				expected: self.config.chain.id,
				actual,
			});
		}
		tracing::info!(chain_id = actual, "Connected to expected network");
		Ok(())
	}

	/// Runs the full pipeline once.
	///
	/// Either completes with the bundle accepted (and the opportunity
	/// transaction on chain) or returns the error of the stage that failed;
	/// nothing is ever left half-submitted silently.
	pub async fn run(&self) -> Result<(), PipelineError> {
		self.verify_network().await?;

		BondManager::new(
			Arc::clone(&self.chain),
			self.accounts.solver().clone(),
			self.config.contracts.entrypoint,
			self.config.chain.id,
			self.config.fees,
		)
		.ensure_bonded(self.config.bidding.min_bond)
		.await?;

		let tx = TransactionBuilder::new(
			Arc::clone(&self.chain),
			self.accounts.opportunity().clone(),
			self.config.chain.id,
			self.config.fees,
		)
		.build()
		.await?;
		tracing::info!(tx_hash = %tx.hash, "Built opportunity transaction");

		let user_op_hash = HashCorrelator::new(
			Arc::clone(&self.chain),
			self.config.contracts.control,
			self.config.contracts.dapp_signer,
		)
		.correlate(&tx)
		.await?;

		let domain = operation_domain(
			&self.config.signing_domain.name,
			&self.config.signing_domain.version,
			self.config.chain.id,
			self.config.contracts.verification,
		);
		let operation = OperationSigner::new(
			self.accounts.solver().clone(),
			domain,
			self.config.contracts.entrypoint,
			self.config.contracts.control,
			self.config.contracts.dapp_signer,
		)
		.sign(
			user_op_hash,
			self.config.bidding.default_bid,
			tx.max_fee_per_gas,
			tx.max_priority_fee_per_gas,
		)?;

		let bundle = Bundle::assemble(&operation, &tx.raw);

		let policy = RetryPolicy::new(
			self.config.relay.max_attempts,
			Duration::from_secs(self.config.relay.retry_delay_secs),
		);
		RelaySubmitter::new(Arc::clone(&self.chain), Arc::clone(&self.relay), policy)
			.submit(&bundle, &tx)
			.await
	}
}
