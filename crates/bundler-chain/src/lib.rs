//! Chain access module for the bundler system.
//!
//! This module defines the read-and-broadcast surface the pipeline needs from
//! a chain node: fee estimation, nonce and code queries, read-only calls with
//! revert capture, transaction lookup, raw broadcast, and confirmation waits.
//! The trait keeps the pipeline testable against doubles; the Alloy-backed
//! implementation lives under `implementations`.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use bundler_types::{FeeEstimate, TransactionReceipt};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

pub use implementations::evm::alloy::AlloyChain;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a read-only call reverts.
	///
	/// Carries the raw revert payload when the node returned one; the
	/// payload is surfaced for diagnostics, not interpreted.
	#[error("Call reverted: {message}")]
	CallReverted {
		/// Node-reported error message.
		message: String,
		/// Raw revert data, if the node included any.
		data: Option<String>,
	},
	/// Error that occurs when a transaction cannot be broadcast or mined.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
}

/// Trait defining the chain access surface used by the pipeline.
///
/// All methods are read-only against chain state except [`broadcast`], which
/// submits an already-signed transaction. Implementations must be safe for
/// concurrent use; the pipeline itself calls them sequentially.
///
/// [`broadcast`]: ChainInterface::broadcast
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// Returns the chain id reported by the connected node.
	async fn chain_id(&self) -> Result<u64, ChainError>;

	/// Estimates EIP-1559 fees for the next block.
	async fn estimate_fees(&self) -> Result<FeeEstimate, ChainError>;

	/// Returns the next transaction nonce for `address`.
	async fn nonce(&self, address: Address) -> Result<u64, ChainError>;

	/// Returns true if `address` has deployed code.
	async fn has_code(&self, address: Address) -> Result<bool, ChainError>;

	/// Performs a read-only call against `to` with the given calldata.
	///
	/// A revert surfaces as [`ChainError::CallReverted`] with any revert
	/// payload the node returned.
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;

	/// Returns true if a transaction with the given hash is known to the node
	/// (pending or mined).
	async fn transaction_exists(&self, hash: B256) -> Result<bool, ChainError>;

	/// Broadcasts a raw signed transaction and returns its hash.
	async fn broadcast(&self, raw: &Bytes) -> Result<B256, ChainError>;

	/// Waits until the transaction is included in a block and returns its
	/// receipt.
	async fn wait_for_inclusion(&self, hash: B256) -> Result<TransactionReceipt, ChainError>;
}
