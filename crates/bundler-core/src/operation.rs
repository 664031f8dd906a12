//! Solver operation construction and signing.
//!
//! Assembles the solver operation record around a derived identifier and
//! signs it under the configured EIP-712 domain. The call payload here is a
//! zero-argument `solve()` invocation; a production solver would substitute
//! its actual backrun call.

use crate::abi::ISolverContract;
use crate::error::PipelineError;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{Eip712Domain, SolCall};
use bundler_account::LocalWallet;
use bundler_types::SolverOperation;

/// Gas limit advertised for the demonstration solver call.
pub const SOLVER_GAS_LIMIT: u64 = 21_000;

/// Builds and signs solver operations.
pub struct OperationSigner {
	wallet: LocalWallet,
	domain: Eip712Domain,
	entrypoint: Address,
	control: Address,
	dapp_signer: Address,
}

impl OperationSigner {
	/// Creates a signer bound to the given domain and contract addresses.
	pub fn new(
		wallet: LocalWallet,
		domain: Eip712Domain,
		entrypoint: Address,
		control: Address,
		dapp_signer: Address,
	) -> Self {
		Self {
			wallet,
			domain,
			entrypoint,
			control,
			dapp_signer,
		}
	}

	/// Assembles and signs a solver operation for the given identifier.
	///
	/// The unsigned encoding is deterministic, so the same inputs always
	/// yield the same digest and, with the same key, the same signature.
	pub fn sign(
		&self,
		user_op_hash: B256,
		bid_amount: U256,
		max_fee_per_gas: u128,
		max_priority_fee_per_gas: u128,
	) -> Result<SolverOperation, PipelineError> {
		let data: Bytes = ISolverContract::solveCall {}.abi_encode().into();

		tracing::debug!(
			from = %self.wallet.address(),
			to = %self.entrypoint,
			max_fee_per_gas,
			max_priority_fee_per_gas,
			bid_amount = %bid_amount,
			user_op_hash = %user_op_hash,
			"Building solver operation"
		);

		let mut operation = SolverOperation {
			from: self.wallet.address(),
			to: self.entrypoint,
			value: U256::ZERO,
			gas: U256::from(SOLVER_GAS_LIMIT),
			max_fee_per_gas: U256::from(max_fee_per_gas),
			deadline: U256::ZERO,
			solver: self.dapp_signer,
			control: self.control,
			user_op_hash,
			bid_token: Address::ZERO,
			bid_amount,
			data,
			signature: Bytes::new(),
		};

		let digest = operation.signing_hash(&self.domain);
		operation.signature = self.wallet.sign_digest(&digest)?;
		Ok(operation)
	}
}
