//! Chain-side result types for the bundler system.
//!
//! These types carry the results of read-only chain queries and transaction
//! confirmation waits across the pipeline without exposing provider types.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// EIP-1559 fee estimate for the target chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEstimate {
	/// Maximum total fee per gas, in wei.
	pub max_fee_per_gas: u128,
	/// Maximum priority fee per gas, in wei.
	pub max_priority_fee_per_gas: u128,
}

/// Transaction receipt containing execution details.
///
/// Provides information about a transaction after it has been included in a
/// block, including its success status and block number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: B256,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
}
