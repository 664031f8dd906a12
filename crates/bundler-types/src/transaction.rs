//! Opportunity transaction type for the bundler system.
//!
//! The opportunity transaction is the signed anchor transaction whose hash
//! ties a solver operation to a specific on-chain action. It is produced once
//! by the transaction builder and never mutated afterwards.

use alloy_primitives::{Address, Bytes, B256};

use crate::utils::with_0x_prefix;

/// A fully-formed, signed EIP-1559 transaction ready for broadcast.
///
/// Holds the raw signed encoding together with the values later stages need:
/// the transaction hash used for identifier derivation and on-chain lookup,
/// and the two fee fields the control contract binds the identifier to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityTransaction {
	/// Raw signed transaction bytes (EIP-2718 typed encoding).
	pub raw: Bytes,
	/// keccak256 of the raw signed encoding.
	pub hash: B256,
	/// Address that signed the transaction.
	pub sender: Address,
	/// Maximum total fee per gas, in wei.
	pub max_fee_per_gas: u128,
	/// Maximum priority fee per gas, in wei.
	pub max_priority_fee_per_gas: u128,
}

impl OpportunityTransaction {
	/// Returns the raw signed encoding as a 0x-prefixed hex string.
	pub fn raw_hex(&self) -> String {
		with_0x_prefix(&hex::encode(&self.raw))
	}
}
