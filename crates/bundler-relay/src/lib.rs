//! Relay access module for the bundler system.
//!
//! This module defines the submission surface towards the off-chain relay and
//! the fixed-delay retry policy the pipeline wraps around it. The HTTP
//! implementation lives under `implementations`.

use async_trait::async_trait;
use bundler_types::Bundle;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

/// Retry policy applied around submission attempts.
pub mod retry;

pub use implementations::http::HttpRelay;
pub use retry::{RetryError, RetryPolicy};

/// Errors that can occur during relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
	/// Error that occurs during network communication with the relay.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when the relay rejects a bundle at the protocol
	/// level.
	#[error("Relay rejected bundle: {0}")]
	Rejected(String),
	/// Error that occurs when the relay's response body cannot be decoded.
	#[error("Invalid relay response: {0}")]
	InvalidResponse(String),
}

/// Trait defining the interface to a bundle relay.
///
/// A submission either yields the relay's acknowledgment payload or a typed
/// error; the caller decides whether and when to retry.
#[async_trait]
pub trait RelayInterface: Send + Sync {
	/// Submits a bundle and returns the relay's acknowledgment payload.
	async fn submit_bundle(&self, bundle: &Bundle) -> Result<serde_json::Value, RelayError>;
}
