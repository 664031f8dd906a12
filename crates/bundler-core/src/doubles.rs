//! Test doubles for the chain and relay interfaces.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use bundler_chain::{ChainError, ChainInterface};
use bundler_relay::{RelayError, RelayInterface};
use bundler_types::{Bundle, FeeEstimate, TransactionReceipt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

/// Scripted outcome of read-only calls against the control contract.
pub(crate) enum CallBehavior {
	/// Return the given bytes.
	Return(Bytes),
	/// Revert with the given message and optional payload.
	Revert {
		message: String,
		data: Option<String>,
	},
}

/// In-memory chain double with per-method call counters.
pub(crate) struct MockChain {
	pub chain_id: u64,
	pub fees: FeeEstimate,
	pub nonce: u64,
	pub has_code: bool,
	pub call_behavior: CallBehavior,
	pub bonded_balance: U256,
	/// Whether the opportunity transaction is known to the node. Broadcast
	/// flips this to true, mirroring propagation.
	pub tx_exists: AtomicBool,
	pub code_checks: AtomicU32,
	pub calls: AtomicU32,
	pub lookups: AtomicU32,
	pub broadcasts: AtomicU32,
}

impl Default for MockChain {
	fn default() -> Self {
		Self {
			chain_id: 137,
			fees: FeeEstimate {
				max_fee_per_gas: 100_000_000_000,
				max_priority_fee_per_gas: 30_000_000_000,
			},
			nonce: 0,
			has_code: true,
			call_behavior: CallBehavior::Return(Bytes::from(vec![0u8; 32])),
			bonded_balance: U256::MAX,
			tx_exists: AtomicBool::new(false),
			code_checks: AtomicU32::new(0),
			calls: AtomicU32::new(0),
			lookups: AtomicU32::new(0),
			broadcasts: AtomicU32::new(0),
		}
	}
}

#[async_trait]
impl ChainInterface for MockChain {
	async fn chain_id(&self) -> Result<u64, ChainError> {
		Ok(self.chain_id)
	}

	async fn estimate_fees(&self) -> Result<FeeEstimate, ChainError> {
		Ok(self.fees)
	}

	async fn nonce(&self, _address: Address) -> Result<u64, ChainError> {
		Ok(self.nonce)
	}

	async fn has_code(&self, _address: Address) -> Result<bool, ChainError> {
		self.code_checks.fetch_add(1, Ordering::SeqCst);
		Ok(self.has_code)
	}

	async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, ChainError> {
		// Bond balance queries answer from the scripted balance; everything
		// else follows the scripted call behavior.
		if data.starts_with(&crate::abi::IAtlas::balanceOfBondedCall::SELECTOR) {
			return Ok(self.bonded_balance.abi_encode().into());
		}

		self.calls.fetch_add(1, Ordering::SeqCst);
		match &self.call_behavior {
			CallBehavior::Return(bytes) => Ok(bytes.clone()),
			CallBehavior::Revert { message, data } => Err(ChainError::CallReverted {
				message: message.clone(),
				data: data.clone(),
			}),
		}
	}

	async fn transaction_exists(&self, _hash: B256) -> Result<bool, ChainError> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		Ok(self.tx_exists.load(Ordering::SeqCst))
	}

	async fn broadcast(&self, raw: &Bytes) -> Result<B256, ChainError> {
		self.broadcasts.fetch_add(1, Ordering::SeqCst);
		self.tx_exists.store(true, Ordering::SeqCst);
		Ok(keccak256(raw))
	}

	async fn wait_for_inclusion(&self, hash: B256) -> Result<TransactionReceipt, ChainError> {
		Ok(TransactionReceipt {
			hash,
			block_number: 1,
			success: true,
		})
	}
}

/// Relay double driven by a scripted queue of outcomes.
///
/// When the script is exhausted the fallback outcome repeats.
pub(crate) struct MockRelay {
	script: Mutex<VecDeque<Result<serde_json::Value, String>>>,
	fallback: Result<serde_json::Value, String>,
	pub calls: AtomicU32,
}

impl MockRelay {
	/// Accepts every submission.
	pub fn accepting() -> Self {
		Self {
			script: Mutex::new(VecDeque::new()),
			fallback: Ok(serde_json::json!("ok")),
			calls: AtomicU32::new(0),
		}
	}

	/// Rejects every submission with the given message.
	pub fn rejecting(message: &str) -> Self {
		Self {
			script: Mutex::new(VecDeque::new()),
			fallback: Err(message.to_string()),
			calls: AtomicU32::new(0),
		}
	}

	/// Rejects the first `failures` submissions, then accepts.
	pub fn rejecting_then_accepting(failures: u32, message: &str) -> Self {
		let script = (0..failures).map(|_| Err(message.to_string())).collect();
		Self {
			script: Mutex::new(script),
			fallback: Ok(serde_json::json!("ok")),
			calls: AtomicU32::new(0),
		}
	}
}

#[async_trait]
impl RelayInterface for MockRelay {
	async fn submit_bundle(&self, _bundle: &Bundle) -> Result<serde_json::Value, RelayError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		let outcome = {
			let mut script = self.script.lock().expect("relay script lock");
			script.pop_front().unwrap_or_else(|| self.fallback.clone())
		};
		outcome.map_err(RelayError::Rejected)
	}
}
