//! HTTP relay client for the bundler.
//!
//! Posts bundles to the configured relay endpoint and decodes the JSON-RPC
//! style response body into a tagged result.

use crate::{RelayError, RelayInterface};
use async_trait::async_trait;
use bundler_types::{Bundle, RelayResponse};
use std::time::Duration;

/// HTTP-based relay client.
///
/// One client instance is created per run and reused across submission
/// attempts; the underlying connection pool is managed by reqwest.
pub struct HttpRelay {
	client: reqwest::Client,
	url: reqwest::Url,
}

impl HttpRelay {
	/// Creates a new relay client for `url` with a per-request timeout.
	pub fn new(url: &str, timeout: Duration) -> Result<Self, RelayError> {
		let url = url
			.parse()
			.map_err(|e| RelayError::Network(format!("Invalid relay URL '{}': {}", url, e)))?;
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| RelayError::Network(format!("Failed to build HTTP client: {}", e)))?;
		Ok(Self { client, url })
	}
}

#[async_trait]
impl RelayInterface for HttpRelay {
	async fn submit_bundle(&self, bundle: &Bundle) -> Result<serde_json::Value, RelayError> {
		let response = self
			.client
			.post(self.url.clone())
			.json(bundle)
			.send()
			.await
			.map_err(|e| RelayError::Network(format!("Relay POST failed: {}", e)))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(RelayError::Network(format!(
				"Relay returned HTTP {}: {}",
				status, body
			)));
		}

		let body: RelayResponse = response
			.json()
			.await
			.map_err(|e| RelayError::InvalidResponse(e.to_string()))?;

		match body.into_result() {
			Ok(ack) => {
				tracing::debug!(response = %ack, "Relay accepted bundle");
				Ok(ack)
			}
			Err(err) => Err(RelayError::Rejected(err.message)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bundler_types::SolverOperation;
	use alloy_primitives::{Address, Bytes, B256, U256};

	fn sample_bundle() -> Bundle {
		let op = SolverOperation {
			from: Address::ZERO,
			to: Address::ZERO,
			value: U256::ZERO,
			gas: U256::from(21_000u64),
			max_fee_per_gas: U256::from(1u64),
			deadline: U256::ZERO,
			solver: Address::ZERO,
			control: Address::ZERO,
			user_op_hash: B256::ZERO,
			bid_token: Address::ZERO,
			bid_amount: U256::from(1u64),
			data: Bytes::new(),
			signature: Bytes::from(vec![0u8; 65]),
		};
		Bundle::assemble(&op, &[0x02, 0x01])
	}

	#[tokio::test]
	async fn accepts_result_response() {
		let mut server = mockito::Server::new_async().await;
		let mock = server
			.mock("POST", "/")
			.match_header("content-type", "application/json")
			.with_status(200)
			.with_body(r#"{"result":"bundle queued"}"#)
			.create_async()
			.await;

		let relay = HttpRelay::new(&server.url(), Duration::from_secs(5)).unwrap();
		let ack = relay.submit_bundle(&sample_bundle()).await.unwrap();
		assert_eq!(ack, serde_json::json!("bundle queued"));
		mock.assert_async().await;
	}

	#[tokio::test]
	async fn surfaces_protocol_error() {
		let mut server = mockito::Server::new_async().await;
		server
			.mock("POST", "/")
			.with_status(200)
			.with_body(r#"{"error":{"message":"insufficient bond"}}"#)
			.create_async()
			.await;

		let relay = HttpRelay::new(&server.url(), Duration::from_secs(5)).unwrap();
		let err = relay.submit_bundle(&sample_bundle()).await.unwrap_err();
		assert!(matches!(err, RelayError::Rejected(ref m) if m == "insufficient bond"));
	}

	#[tokio::test]
	async fn surfaces_http_failure() {
		let mut server = mockito::Server::new_async().await;
		server
			.mock("POST", "/")
			.with_status(502)
			.with_body("bad gateway")
			.create_async()
			.await;

		let relay = HttpRelay::new(&server.url(), Duration::from_secs(5)).unwrap();
		let err = relay.submit_bundle(&sample_bundle()).await.unwrap_err();
		assert!(matches!(err, RelayError::Network(_)));
	}

	#[tokio::test]
	async fn surfaces_undecodable_body() {
		let mut server = mockito::Server::new_async().await;
		server
			.mock("POST", "/")
			.with_status(200)
			.with_body("not json")
			.create_async()
			.await;

		let relay = HttpRelay::new(&server.url(), Duration::from_secs(5)).unwrap();
		let err = relay.submit_bundle(&sample_bundle()).await.unwrap_err();
		assert!(matches!(err, RelayError::InvalidResponse(_)));
	}
}
