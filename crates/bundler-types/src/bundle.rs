//! Relay bundle envelope and relay response types.
//!
//! The bundle is the wire-level unit submitted to the relay: a JSON-RPC
//! request pairing the raw opportunity transaction with the JSON-encoded
//! solver operation. It is assembled exactly once and reused unchanged across
//! submission retries.

use serde::{Deserialize, Serialize};

use crate::operation::SolverOperation;
use crate::utils::with_0x_prefix;

/// JSON-RPC method the relay expects bundles on.
pub const BUNDLE_METHOD: &str = "pfl_addSearcherBundle";

/// JSON-RPC protocol version used for bundle submission.
pub const JSONRPC_VERSION: &str = "2.0";

/// A searcher bundle in the relay's wire format.
///
/// `params` is positional: the raw signed opportunity transaction as a
/// 0x-prefixed hex string, followed by the solver operation serialized to a
/// JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
	/// Request id; the pipeline submits one bundle per run.
	pub id: u64,
	/// Protocol version, always [`JSONRPC_VERSION`].
	pub jsonrpc: String,
	/// Submission method, always [`BUNDLE_METHOD`].
	pub method: String,
	/// Positional parameters: `[raw_tx_hex, operation_json]`.
	pub params: [String; 2],
}

impl Bundle {
	/// Packages a signed solver operation and raw transaction bytes into the
	/// relay's request envelope.
	///
	/// Pure assembly: no I/O and no failure modes. The operation serializes
	/// infallibly (all fields are plain hex-encodable values), so a serde
	/// failure here is a programming error.
	pub fn assemble(operation: &SolverOperation, raw_tx: &[u8]) -> Self {
		let operation_json = serde_json::to_string(operation)
			.expect("solver operation serializes to JSON");
		Self {
			id: 1,
			jsonrpc: JSONRPC_VERSION.to_string(),
			method: BUNDLE_METHOD.to_string(),
			params: [with_0x_prefix(&hex::encode(raw_tx)), operation_json],
		}
	}
}

/// Protocol-level error body returned by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayErrorBody {
	/// Human-readable rejection reason.
	pub message: String,
	/// Optional relay-specific error code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<i64>,
}

/// Decoded relay response: success acknowledgment or protocol-level error.
///
/// The relay answers every well-formed POST with a JSON body carrying either
/// a `result` or an `error` member; this type makes that tagged instead of
/// duck-typed.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayResponse {
	/// Acknowledgment payload on success.
	pub result: Option<serde_json::Value>,
	/// Rejection details when the relay refused the bundle.
	pub error: Option<RelayErrorBody>,
}

impl RelayResponse {
	/// Converts the response into a tagged result.
	///
	/// A body with an `error` member is a rejection even if `result` is also
	/// present; a body with neither is treated as an empty acknowledgment.
	pub fn into_result(self) -> Result<serde_json::Value, RelayErrorBody> {
		match self.error {
			Some(err) => Err(err),
			None => Ok(self.result.unwrap_or(serde_json::Value::Null)),
		}
	}
}
