//! Bundle submission with bounded retries and on-chain reconciliation.
//!
//! A submission attempt POSTs the bundle, then reconciles with chain state:
//! if the opportunity transaction is not yet known to the node, it is
//! broadcast directly as a safety net and awaited. The relay is expected to
//! propagate the transaction itself; the presence check keeps retries from
//! ever broadcasting twice.

use crate::error::PipelineError;
use bundler_chain::ChainInterface;
use bundler_relay::{RelayError, RelayInterface, RetryError, RetryPolicy};
use bundler_types::{Bundle, OpportunityTransaction};
use std::sync::Arc;

/// Submits assembled bundles to the relay.
///
/// The bundle and raw transaction are immutable across attempts, so retrying
/// re-sends identical bytes; the worst case of a retry is the relay seeing
/// the same bundle more than once.
pub struct RelaySubmitter {
	chain: Arc<dyn ChainInterface>,
	relay: Arc<dyn RelayInterface>,
	policy: RetryPolicy,
}

impl RelaySubmitter {
	/// Creates a submitter with the given retry policy.
	pub fn new(
		chain: Arc<dyn ChainInterface>,
		relay: Arc<dyn RelayInterface>,
		policy: RetryPolicy,
	) -> Self {
		Self {
			chain,
			relay,
			policy,
		}
	}

	/// Submits the bundle, retrying transient failures up to the policy's
	/// attempt budget.
	///
	/// Exhausting the budget yields `SubmissionExhausted` wrapping the error
	/// from the final attempt.
	pub async fn submit(
		&self,
		bundle: &Bundle,
		tx: &OpportunityTransaction,
	) -> Result<(), PipelineError> {
		let outcome = self
			.policy
			.run(PipelineError::is_retryable, |attempt| {
				self.attempt(bundle, tx, attempt)
			})
			.await;

		match outcome {
			Ok(()) => Ok(()),
			Err(RetryError::Fatal(err)) => Err(err),
			Err(RetryError::Exhausted { attempts, last }) => {
				Err(PipelineError::SubmissionExhausted {
					attempts,
					last: Box::new(last),
				})
			}
		}
	}

	/// One submission attempt: relay POST, presence check, safety-net
	/// broadcast.
	async fn attempt(
		&self,
		bundle: &Bundle,
		tx: &OpportunityTransaction,
		attempt: u32,
	) -> Result<(), PipelineError> {
		tracing::info!(
			attempt,
			max_attempts = self.policy.max_attempts,
			"Submitting bundle to relay"
		);

		let ack = self.relay.submit_bundle(bundle).await.map_err(|e| match e {
			RelayError::Rejected(message) => PipelineError::RelayRejected(message),
			other => PipelineError::RelayRejected(other.to_string()),
		})?;
		tracing::info!(response = %ack, "Relay accepted bundle");

		let exists = self
			.chain
			.transaction_exists(tx.hash)
			.await
			.map_err(|e| PipelineError::Broadcast(e.to_string()))?;
		if exists {
			tracing::info!(tx_hash = %tx.hash, "Opportunity transaction already known to the chain");
			return Ok(());
		}

		// The relay normally propagates the transaction itself; this direct
		// broadcast is a safety net, guarded by the presence check above.
		let hash = self
			.chain
			.broadcast(&tx.raw)
			.await
			.map_err(|e| PipelineError::Broadcast(e.to_string()))?;

		let receipt = self
			.chain
			.wait_for_inclusion(hash)
			.await
			.map_err(|e| PipelineError::Broadcast(e.to_string()))?;
		tracing::info!(
			block_number = receipt.block_number,
			success = receipt.success,
			"Opportunity transaction confirmed"
		);

		Ok(())
	}
}
