//! Transaction model, wire codec, unspent-set helpers, and validation.
//!
//! The module splits along the transaction lifecycle:
//!
//! - [`types`]: the data model. [`Transaction`], [`TxId`], [`OutPoint`],
//!   [`TxOutput`], and the canonical record codecs.
//! - [`wire`]: strict framing between a transaction and its canonical
//!   bytes. The bytes feed SHA-256 to produce the id.
//! - [`utxo`]: what a transaction does to the unspent set, as data.
//! - [`verification`]: the acceptance rules, in two entry points that
//!   share one rule set.
//!
//! A transaction is built (or parsed), gains its identity from its bytes,
//! gets validated against evidence for what it spends, and finally yields
//! a [`UtxoDiff`] for the store to apply. Nothing in here talks to disk or
//! network; callers bring evidence, this module brings judgement.

pub mod types;
pub mod utxo;
pub mod verification;
pub mod wire;

// The whole public surface, flattened so callers never spell out the
// submodule paths.
pub use types::{OutPoint, Transaction, TxId, TxOutput};
pub use utxo::{UtxoDiff, UtxoEntry};
pub use verification::{verify_with_prior_outputs, verify_with_prior_transactions, ValidationError};
pub use wire::WireError;
