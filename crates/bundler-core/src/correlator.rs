//! Operation identifier derivation.
//!
//! Asks the controlling dApp contract for the identifier that binds the
//! opportunity transaction's hash and fee parameters to the configured
//! operation signer. This read-only call doubles as the single external check
//! that the opportunity transaction is well-formed for the relay: a revert
//! here is a structural mismatch, so no retry is applied.

use crate::abi::IDAppControl;
use crate::error::PipelineError;
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use bundler_chain::{ChainError, ChainInterface};
use bundler_types::OpportunityTransaction;
use std::sync::Arc;

/// Derives operation identifiers from the control contract.
pub struct HashCorrelator {
	chain: Arc<dyn ChainInterface>,
	control: Address,
	dapp_signer: Address,
}

impl HashCorrelator {
	/// Creates a correlator against the given control contract.
	pub fn new(chain: Arc<dyn ChainInterface>, control: Address, dapp_signer: Address) -> Self {
		Self {
			chain,
			control,
			dapp_signer,
		}
	}

	/// Returns the operation identifier for the given opportunity transaction.
	///
	/// Verifies that the control contract has deployed code before calling
	/// it, so a misconfigured address fails as `ContractNotFound` instead of
	/// an opaque empty return.
	pub async fn correlate(&self, tx: &OpportunityTransaction) -> Result<B256, PipelineError> {
		if !self.chain.has_code(self.control).await? {
			return Err(PipelineError::ContractNotFound(self.control));
		}

		let call = IDAppControl::getBackrunUserOpHashCall {
			oppTxHash: tx.hash,
			oppTxMaxFeePerGas: U256::from(tx.max_fee_per_gas),
			oppTxMaxPriorityFeePerGas: U256::from(tx.max_priority_fee_per_gas),
			fastLaneSigner: self.dapp_signer,
		};

		let ret = match self.chain.call(self.control, call.abi_encode().into()).await {
			Ok(ret) => ret,
			Err(ChainError::CallReverted { message, data }) => {
				return Err(PipelineError::CorrelationReverted { message, data })
			}
			Err(other) => return Err(other.into()),
		};

		let decoded = IDAppControl::getBackrunUserOpHashCall::abi_decode_returns(&ret, true)
			.map_err(|e| {
				PipelineError::Chain(ChainError::Network(format!(
					"Undecodable identifier return: {}",
					e
				)))
			})?;

		tracing::info!(user_op_hash = %decoded.userOpHash, "Derived operation identifier");
		Ok(decoded.userOpHash)
	}
}
