//! Common types module for the bundler system.
//!
//! This module defines the core data types shared across the bundle
//! construction and submission pipeline: the opportunity transaction, the
//! solver operation and its EIP-712 signing payload, the relay bundle
//! envelope, and chain-side result types. It provides a centralized location
//! for shared types to ensure consistency across all bundler components.

/// Relay bundle envelope and relay response types.
pub mod bundle;
/// Chain-side result types for fee estimation and transaction receipts.
pub mod chain;
/// Solver operation wire type and its EIP-712 signing payload.
pub mod operation;
/// Secure string type for private key material.
pub mod secret_string;
/// Opportunity transaction type.
pub mod transaction;
/// Hex formatting helpers.
pub mod utils;

// Re-export all types for convenient access
pub use bundle::*;
pub use chain::*;
pub use operation::*;
pub use secret_string::SecretString;
pub use transaction::*;
pub use utils::{with_0x_prefix, without_0x_prefix};
