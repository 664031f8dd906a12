//! Opportunity transaction construction.
//!
//! Builds and signs the anchor transaction: a fixed-cost self-transfer whose
//! only purpose is to exist as a hashable, broadcastable target for the
//! solver operation. It performs no economically meaningful action itself.

use crate::error::PipelineError;
use alloy_consensus::TxEip1559;
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Bytes, TxKind, U256};
use bundler_account::LocalWallet;
use bundler_chain::ChainInterface;
use bundler_config::{FeeConfig, FeeMode};
use bundler_types::{FeeEstimate, OpportunityTransaction};
use std::sync::Arc;

/// Gas limit for the plain-transfer opportunity transaction.
pub const OPPORTUNITY_GAS_LIMIT: u64 = 21_000;

/// Builds and signs opportunity transactions.
pub struct TransactionBuilder {
	chain: Arc<dyn ChainInterface>,
	wallet: LocalWallet,
	chain_id: u64,
	fees: FeeConfig,
}

impl TransactionBuilder {
	/// Creates a builder for the given chain, signing wallet, and fee policy.
	pub fn new(
		chain: Arc<dyn ChainInterface>,
		wallet: LocalWallet,
		chain_id: u64,
		fees: FeeConfig,
	) -> Self {
		Self {
			chain,
			wallet,
			chain_id,
			fees,
		}
	}

	/// Builds a signed opportunity transaction.
	///
	/// Fees come from the configured policy, the nonce from the sender's
	/// current on-chain sequence number. Signing itself is local; the result
	/// is immutable and reused across all later stages.
	pub async fn build(&self) -> Result<OpportunityTransaction, PipelineError> {
		let fees = resolve_fees(self.chain.as_ref(), &self.fees).await?;
		let sender = self.wallet.address();
		let nonce = self.chain.nonce(sender).await?;

		tracing::debug!(
			%sender,
			nonce,
			max_fee_per_gas = fees.max_fee_per_gas,
			max_priority_fee_per_gas = fees.max_priority_fee_per_gas,
			"Building opportunity transaction"
		);

		let tx = TxEip1559 {
			chain_id: self.chain_id,
			nonce,
			gas_limit: OPPORTUNITY_GAS_LIMIT,
			max_fee_per_gas: fees.max_fee_per_gas,
			max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
			to: TxKind::Call(sender),
			value: U256::ZERO,
			access_list: AccessList::default(),
			input: Bytes::new(),
		};
		let (raw, hash) = self.wallet.sign_transaction(tx)?;

		Ok(OpportunityTransaction {
			raw,
			hash,
			sender,
			max_fee_per_gas: fees.max_fee_per_gas,
			max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
		})
	}
}

/// Resolves the fee pair from the configured policy.
///
/// Static mode reads both values from configuration; estimate mode asks the
/// node. Either way, failing to produce both fields is `FeeUnavailable`.
pub(crate) async fn resolve_fees(
	chain: &dyn ChainInterface,
	config: &FeeConfig,
) -> Result<FeeEstimate, PipelineError> {
	match config.mode {
		FeeMode::Static => match (config.max_fee_per_gas, config.max_priority_fee_per_gas) {
			(Some(max_fee_per_gas), Some(max_priority_fee_per_gas)) => Ok(FeeEstimate {
				max_fee_per_gas,
				max_priority_fee_per_gas,
			}),
			_ => Err(PipelineError::FeeUnavailable(
				"static fee mode is missing one or both fee values".to_string(),
			)),
		},
		FeeMode::Estimate => chain
			.estimate_fees()
			.await
			.map_err(|e| PipelineError::FeeUnavailable(e.to_string())),
	}
}
