//! Solver operation wire type and its EIP-712 signing payload.
//!
//! A solver operation is a signed, off-chain-submitted description of the
//! counter-transaction a solver commits to execute. The relay and the
//! verification contract check its signature against the fields below, so the
//! wire encoding and the typed-data payload must stay in lockstep.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, Eip712Domain, SolStruct};
use serde::{Deserialize, Serialize};

sol! {
	/// Solver operation fields covered by the EIP-712 signature.
	///
	/// Field order matters: the struct hash is computed over this exact
	/// sequence, and reordering it invalidates every signature.
	struct SolverOperationPayload {
		address from;
		address to;
		uint256 value;
		uint256 gas;
		uint256 maxFeePerGas;
		uint256 deadline;
		address solver;
		address control;
		bytes32 userOpHash;
		address bidToken;
		uint256 bidAmount;
		bytes data;
	}
}

/// A solver operation as submitted to the relay.
///
/// All fields except `signature` are fixed at construction; `signature` starts
/// empty and is filled exactly once by the operation signer. The JSON field
/// names match the relay's expected camelCase encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverOperation {
	/// Address of the solver account originating the operation.
	pub from: Address,
	/// Entrypoint contract the operation executes through.
	pub to: Address,
	/// Native value carried by the operation.
	pub value: U256,
	/// Gas limit for the solver call.
	pub gas: U256,
	/// Maximum total fee per gas, mirroring the opportunity transaction.
	pub max_fee_per_gas: U256,
	/// Deadline block (zero means no deadline).
	pub deadline: U256,
	/// Address authorized to sign operations for the controlling dApp.
	pub solver: Address,
	/// Controlling dApp contract.
	pub control: Address,
	/// Identifier binding this operation to the opportunity transaction.
	pub user_op_hash: B256,
	/// Token the bid is denominated in (zero address for the native token).
	pub bid_token: Address,
	/// Bid amount in the bid token's smallest unit.
	pub bid_amount: U256,
	/// ABI-encoded call the solver contract executes.
	pub data: Bytes,
	/// EIP-712 signature over all other fields; empty until signed.
	pub signature: Bytes,
}

impl SolverOperation {
	/// Returns the typed-data payload covered by the signature.
	///
	/// The `signature` field is deliberately absent: signing covers every
	/// other field, in declaration order.
	pub fn signing_payload(&self) -> SolverOperationPayload {
		SolverOperationPayload {
			from: self.from,
			to: self.to,
			value: self.value,
			gas: self.gas,
			maxFeePerGas: self.max_fee_per_gas,
			deadline: self.deadline,
			solver: self.solver,
			control: self.control,
			userOpHash: self.user_op_hash,
			bidToken: self.bid_token,
			bidAmount: self.bid_amount,
			data: self.data.clone(),
		}
	}

	/// Computes the EIP-712 digest of this operation under `domain`.
	///
	/// Deterministic: the same fields and domain always produce the same
	/// digest, so signatures are reproducible given the same key.
	pub fn signing_hash(&self, domain: &Eip712Domain) -> B256 {
		self.signing_payload().eip712_signing_hash(domain)
	}
}

/// Builds the EIP-712 domain that scopes solver operation signatures.
///
/// The domain pins name, version, chain id, and the verification contract so
/// a signature produced for one deployment cannot be replayed against another.
pub fn operation_domain(
	name: &str,
	version: &str,
	chain_id: u64,
	verifying_contract: Address,
) -> Eip712Domain {
	Eip712Domain::new(
		Some(name.to_string().into()),
		Some(version.to_string().into()),
		Some(U256::from(chain_id)),
		Some(verifying_contract),
		None,
	)
}
