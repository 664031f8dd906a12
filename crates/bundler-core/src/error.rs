//! Error taxonomy for the bundle pipeline.
//!
//! Structural errors (wrong network, missing contract, reverted correlation)
//! abort immediately: retrying cannot change a structural mismatch. Transient
//! errors (relay rejections, broadcast failures) are retried up to the fixed
//! budget, then surfaced as a single terminal error preserving the last
//! underlying cause.

use alloy_primitives::Address;
use bundler_account::AccountError;
use bundler_chain::ChainError;
use thiserror::Error;

/// Errors that can occur while building and submitting a bundle.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// The connected node reports a different chain than configured.
	#[error("Connected to chain {actual}, expected chain {expected}")]
	NetworkMismatch {
		/// Chain id from configuration.
		expected: u64,
		/// Chain id reported by the node.
		actual: u64,
	},
	/// Fee estimation could not produce both required fee fields.
	#[error("Fee data unavailable: {0}")]
	FeeUnavailable(String),
	/// The configured control contract has no deployed code.
	#[error("No contract code at {0}")]
	ContractNotFound(Address),
	/// The identifier derivation call reverted.
	///
	/// Carries the raw revert payload for diagnostics; the payload is not
	/// interpreted further.
	#[error("Identifier derivation reverted: {message}")]
	CorrelationReverted {
		/// Node-reported error message.
		message: String,
		/// Raw revert data, if the node included any.
		data: Option<String>,
	},
	/// A local signing operation failed.
	#[error("Signing failed: {0}")]
	Signing(#[from] AccountError),
	/// The relay refused the bundle, or could not be reached.
	#[error("Relay rejected bundle: {0}")]
	RelayRejected(String),
	/// The safety-net broadcast or a chain-side submission step failed.
	#[error("Broadcast failed: {0}")]
	Broadcast(String),
	/// The attempt budget ran out; wraps the error from the final attempt.
	#[error("Submission failed after {attempts} attempts: {last}")]
	SubmissionExhausted {
		/// Number of attempts made.
		attempts: u32,
		/// Error from the final attempt.
		last: Box<PipelineError>,
	},
	/// A chain query outside the submission loop failed.
	#[error("Chain request failed: {0}")]
	Chain(#[from] ChainError),
}

impl PipelineError {
	/// Returns true for errors that another submission attempt might clear.
	///
	/// Only the submission-stage errors qualify; everything else indicates a
	/// structural mismatch or local failure that retrying cannot fix.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			PipelineError::RelayRejected(_)
				| PipelineError::Broadcast(_)
				| PipelineError::Chain(_)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn submission_errors_are_retryable() {
		assert!(PipelineError::RelayRejected("late".to_string()).is_retryable());
		assert!(PipelineError::Broadcast("refused".to_string()).is_retryable());
		assert!(PipelineError::Chain(ChainError::Network("down".to_string())).is_retryable());
	}

	#[test]
	fn structural_errors_are_not_retryable() {
		assert!(!PipelineError::NetworkMismatch {
			expected: 137,
			actual: 1
		}
		.is_retryable());
		assert!(!PipelineError::ContractNotFound(Address::ZERO).is_retryable());
		assert!(!PipelineError::CorrelationReverted {
			message: "reverted".to_string(),
			data: None
		}
		.is_retryable());
		assert!(!PipelineError::FeeUnavailable("no data".to_string()).is_retryable());
	}
}
