//! Alloy-backed chain access for the bundler.
//!
//! This implementation talks to an EVM node over HTTP JSON-RPC using the
//! Alloy provider stack. It performs no signing; transactions arrive here
//! already signed and encoded.

use crate::{ChainError, ChainInterface};
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_transport_http::Http;
use async_trait::async_trait;
use bundler_types::{with_0x_prefix, FeeEstimate, TransactionReceipt};
use std::sync::Arc;
use std::time::Duration;

/// Interval between receipt polls while waiting for inclusion.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(7);

/// Upper bound on a single inclusion wait.
const INCLUSION_TIMEOUT: Duration = Duration::from_secs(600);

/// Alloy-based EVM chain access.
///
/// Holds a single HTTP provider for the configured node. The provider is
/// cheap to share and safe for concurrent use.
pub struct AlloyChain {
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
}

impl AlloyChain {
	/// Connects to the node at `rpc_url`.
	///
	/// Only validates the URL; the first RPC call happens lazily.
	pub fn connect(rpc_url: &str) -> Result<Self, ChainError> {
		let url = rpc_url
			.parse()
			.map_err(|e| ChainError::Network(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
		let provider = ProviderBuilder::new().on_http(url);
		Ok(Self {
			provider: Arc::new(provider),
		})
	}
}

#[async_trait]
impl ChainInterface for AlloyChain {
	async fn chain_id(&self) -> Result<u64, ChainError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| ChainError::Network(format!("Failed to get chain id: {}", e)))
	}

	async fn estimate_fees(&self) -> Result<FeeEstimate, ChainError> {
		let estimate = self
			.provider
			.estimate_eip1559_fees(None)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to estimate fees: {}", e)))?;

		Ok(FeeEstimate {
			max_fee_per_gas: estimate.max_fee_per_gas,
			max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
		})
	}

	async fn nonce(&self, address: Address) -> Result<u64, ChainError> {
		self.provider
			.get_transaction_count(address)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to get nonce: {}", e)))
	}

	async fn has_code(&self, address: Address) -> Result<bool, ChainError> {
		let code = self
			.provider
			.get_code_at(address)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to get code: {}", e)))?;

		Ok(!code.is_empty())
	}

	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
		let request = TransactionRequest::default().to(to).input(data.into());

		match self.provider.call(&request).await {
			Ok(bytes) => Ok(bytes),
			Err(e) => match e.as_error_resp() {
				// An error response on a read-only call is a revert or a
				// structural rejection; carry the payload through untouched.
				Some(payload) => Err(ChainError::CallReverted {
					message: payload.message.to_string(),
					data: payload
						.data
						.as_ref()
						.map(|d| d.get().trim_matches('"').to_string()),
				}),
				None => Err(ChainError::Network(format!("Call failed: {}", e))),
			},
		}
	}

	async fn transaction_exists(&self, hash: B256) -> Result<bool, ChainError> {
		let tx = self
			.provider
			.get_transaction_by_hash(hash)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to look up transaction: {}", e)))?;

		Ok(tx.is_some())
	}

	async fn broadcast(&self, raw: &Bytes) -> Result<B256, ChainError> {
		let pending = self
			.provider
			.send_raw_transaction(raw)
			.await
			.map_err(|e| ChainError::TransactionFailed(format!("Broadcast rejected: {}", e)))?;

		let tx_hash = *pending.tx_hash();
		tracing::info!(
			tx_hash = %with_0x_prefix(&hex::encode(tx_hash)),
			"Broadcast transaction"
		);

		Ok(tx_hash)
	}

	async fn wait_for_inclusion(&self, hash: B256) -> Result<TransactionReceipt, ChainError> {
		let start_time = tokio::time::Instant::now();

		loop {
			if start_time.elapsed() > INCLUSION_TIMEOUT {
				return Err(ChainError::TransactionFailed(format!(
					"Timeout waiting for inclusion after {} seconds",
					INCLUSION_TIMEOUT.as_secs()
				)));
			}

			match self.provider.get_transaction_receipt(hash).await {
				Ok(Some(receipt)) => {
					return Ok(TransactionReceipt {
						hash: receipt.transaction_hash,
						block_number: receipt.block_number.unwrap_or(0),
						success: receipt.status(),
					});
				}
				Ok(None) => {
					// Not yet mined, wait and retry.
					tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
				}
				Err(e) => {
					return Err(ChainError::Network(format!("Failed to get receipt: {}", e)));
				}
			}
		}
	}
}
