//! Core pipeline for the bundler system.
//!
//! This module provides the orchestration logic for building and submitting
//! searcher bundles: signing the opportunity transaction, deriving the
//! operation identifier on chain, signing the solver operation, assembling
//! the relay envelope, and submitting it with bounded retries. External
//! services enter through the chain and relay interfaces so every stage can
//! be exercised against doubles.

/// Solidity definitions for the contracts the pipeline talks to.
pub mod abi;
/// Solver bond maintenance.
pub mod bond;
/// Operation identifier derivation.
pub mod correlator;
/// Pipeline error taxonomy.
pub mod error;
/// Solver operation construction and signing.
pub mod operation;
/// End-to-end pipeline wiring.
pub mod pipeline;
/// Relay submission with retries and on-chain reconciliation.
pub mod submitter;
/// Opportunity transaction construction.
pub mod transaction;

#[cfg(test)]
pub(crate) mod doubles;

pub use bond::BondManager;
pub use correlator::HashCorrelator;
pub use error::PipelineError;
pub use operation::OperationSigner;
pub use pipeline::BundlePipeline;
pub use submitter::RelaySubmitter;
pub use transaction::TransactionBuilder;
