//! Solver bond maintenance.
//!
//! The entrypoint contract only accepts operations from solvers with a
//! sufficient bonded balance. Before submitting, the pipeline tops the bond
//! up to the configured minimum by sending a `depositAndBond` transaction
//! carrying the shortfall as value.

use crate::abi::IAtlas;
use crate::error::PipelineError;
use crate::transaction::resolve_fees;
use alloy_consensus::TxEip1559;
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, TxKind, U256};
use alloy_sol_types::SolCall;
use bundler_account::LocalWallet;
use bundler_chain::{ChainError, ChainInterface};
use bundler_config::FeeConfig;
use std::sync::Arc;

/// Gas limit for the `depositAndBond` transaction.
const BOND_TX_GAS_LIMIT: u64 = 300_000;

/// Keeps the solver's bonded balance above the configured minimum.
pub struct BondManager {
	chain: Arc<dyn ChainInterface>,
	wallet: LocalWallet,
	entrypoint: Address,
	chain_id: u64,
	fees: FeeConfig,
}

impl BondManager {
	/// Creates a bond manager for the solver wallet.
	pub fn new(
		chain: Arc<dyn ChainInterface>,
		wallet: LocalWallet,
		entrypoint: Address,
		chain_id: u64,
		fees: FeeConfig,
	) -> Self {
		Self {
			chain,
			wallet,
			entrypoint,
			chain_id,
			fees,
		}
	}

	/// Ensures the solver's bonded balance is at least `minimum`.
	///
	/// Reads the current balance and, when short, deposits and bonds the
	/// difference, waiting for the bond transaction to be mined before
	/// returning.
	pub async fn ensure_bonded(&self, minimum: U256) -> Result<(), PipelineError> {
		let account = self.wallet.address();
		let call = IAtlas::balanceOfBondedCall { account };
		let ret = self
			.chain
			.call(self.entrypoint, call.abi_encode().into())
			.await?;
		let bonded = IAtlas::balanceOfBondedCall::abi_decode_returns(&ret, true)
			.map_err(|e| {
				PipelineError::Chain(ChainError::Network(format!(
					"Undecodable bond balance: {}",
					e
				)))
			})?
			._0;

		if bonded >= minimum {
			tracing::debug!(%bonded, %minimum, "Bonded balance sufficient");
			return Ok(());
		}

		let shortfall = minimum - bonded;
		tracing::info!(%bonded, %minimum, %shortfall, "Bonding additional balance");

		let fees = resolve_fees(self.chain.as_ref(), &self.fees).await?;
		let nonce = self.chain.nonce(account).await?;
		let tx = TxEip1559 {
			chain_id: self.chain_id,
			nonce,
			gas_limit: BOND_TX_GAS_LIMIT,
			max_fee_per_gas: fees.max_fee_per_gas,
			max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
			to: TxKind::Call(self.entrypoint),
			value: shortfall,
			access_list: AccessList::default(),
			input: IAtlas::depositAndBondCall {
				amountToBond: shortfall,
			}
			.abi_encode()
			.into(),
		};
		let (raw, _) = self.wallet.sign_transaction(tx)?;

		let hash = self
			.chain
			.broadcast(&raw)
			.await
			.map_err(|e| PipelineError::Broadcast(e.to_string()))?;
		let receipt = self
			.chain
			.wait_for_inclusion(hash)
			.await
			.map_err(|e| PipelineError::Broadcast(e.to_string()))?;
		if !receipt.success {
			return Err(PipelineError::Broadcast(format!(
				"Bond transaction {} reverted",
				receipt.hash
			)));
		}

		tracing::info!(block_number = receipt.block_number, "Bond transaction confirmed");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::doubles::MockChain;
	use bundler_config::{FeeConfig, FeeMode};
	use bundler_types::SecretString;
	use std::sync::atomic::Ordering;

	const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn manager(chain: Arc<MockChain>) -> BondManager {
		BondManager::new(
			chain,
			LocalWallet::from_secret(&SecretString::from(TEST_KEY)).unwrap(),
			Address::ZERO,
			137,
			FeeConfig {
				mode: FeeMode::Static,
				max_fee_per_gas: Some(100_000_000_000),
				max_priority_fee_per_gas: Some(30_000_000_000),
			},
		)
	}

	#[tokio::test]
	async fn sufficient_bond_sends_nothing() {
		let chain = Arc::new(MockChain {
			bonded_balance: U256::from(2_000_000_000_000_000_000u128),
			..MockChain::default()
		});
		manager(chain.clone())
			.ensure_bonded(U256::from(1_500_000_000_000_000_000u128))
			.await
			.unwrap();
		assert_eq!(chain.broadcasts.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn shortfall_is_bonded_with_one_transaction() {
		let chain = Arc::new(MockChain {
			bonded_balance: U256::from(500_000_000_000_000_000u128),
			..MockChain::default()
		});
		manager(chain.clone())
			.ensure_bonded(U256::from(1_500_000_000_000_000_000u128))
			.await
			.unwrap();
		assert_eq!(chain.broadcasts.load(Ordering::SeqCst), 1);
	}
}
