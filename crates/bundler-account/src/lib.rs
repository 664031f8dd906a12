//! Account management module for the bundler system.
//!
//! This module provides local key management for the two signing roles in the
//! pipeline: the opportunity account that signs the anchor transaction and
//! the solver account that signs operations. Signing is purely local; nothing
//! here touches the network.

use alloy_consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{keccak256, Address, Bytes, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use bundler_types::SecretString;
use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a private key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
}

/// A locally-held signing key.
///
/// Wraps a secp256k1 signer parsed from configured key material and exposes
/// the two signing shapes the pipeline needs: EIP-1559 transaction signing
/// and raw digest signing for EIP-712 payloads.
#[derive(Clone, Debug)]
pub struct LocalWallet {
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Parses a wallet from secret key material.
	pub fn from_secret(key: &SecretString) -> Result<Self, AccountError> {
		let signer = key.with_exposed(|raw| {
			raw.parse::<PrivateKeySigner>()
				.map_err(|e| AccountError::InvalidKey(e.to_string()))
		})?;
		Ok(Self { signer })
	}

	/// Returns the address derived from the signing key.
	pub fn address(&self) -> Address {
		self.signer.address()
	}

	/// Signs an EIP-1559 transaction and returns its raw typed encoding
	/// together with the transaction hash.
	///
	/// The hash is the keccak256 of the returned encoding, which is what the
	/// chain reports once the transaction is broadcast.
	pub fn sign_transaction(&self, tx: TxEip1559) -> Result<(Bytes, B256), AccountError> {
		let signature = self
			.signer
			.sign_hash_sync(&tx.signature_hash())
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;
		let signed: TxEnvelope = tx.into_signed(signature).into();
		let raw = signed.encoded_2718();
		let hash = keccak256(&raw);
		Ok((raw.into(), hash))
	}

	/// Signs a 32-byte digest and returns the 65-byte r || s || v signature.
	///
	/// Used for EIP-712 signing hashes; the digest must already be the final
	/// domain-separated digest.
	pub fn sign_digest(&self, digest: &B256) -> Result<Bytes, AccountError> {
		let signature = self
			.signer
			.sign_hash_sync(digest)
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;
		Ok(Bytes::from(signature.as_bytes().to_vec()))
	}
}

/// Service that manages the pipeline's two signing accounts.
pub struct AccountService {
	/// Signs the opportunity transaction.
	opportunity: LocalWallet,
	/// Signs solver operations.
	solver: LocalWallet,
}

impl AccountService {
	/// Creates a new AccountService from the two wallets.
	pub fn new(opportunity: LocalWallet, solver: LocalWallet) -> Self {
		Self { opportunity, solver }
	}

	/// Parses both wallets from secret key material.
	pub fn from_secrets(
		opportunity_key: &SecretString,
		solver_key: &SecretString,
	) -> Result<Self, AccountError> {
		Ok(Self {
			opportunity: LocalWallet::from_secret(opportunity_key)?,
			solver: LocalWallet::from_secret(solver_key)?,
		})
	}

	/// Returns the wallet that signs the opportunity transaction.
	pub fn opportunity(&self) -> &LocalWallet {
		&self.opportunity
	}

	/// Returns the wallet that signs solver operations.
	pub fn solver(&self) -> &LocalWallet {
		&self.solver
	}
}
