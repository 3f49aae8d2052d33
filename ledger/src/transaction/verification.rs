//! Transaction validation.
//!
//! The rules are few and absolute. An issuing transaction consumes nothing
//! and must be signed by the configured issuing authority. A spending
//! transaction must prove, for every input, that the named output exists,
//! that the presented key is the one the output is locked to, and that the
//! key signed this transaction. Spends conserve value exactly; issuance
//! does not, minting is the point.
//!
//! Two entry points cover the two shapes callers hold evidence in.
//! [`verify_with_prior_outputs`] takes resolved unspent entries, the form
//! a node with a live unspent set has on hand.
//! [`verify_with_prior_transactions`] takes whole serialized prior
//! transactions and resolves them first. The second is a thin layer over
//! the first, so the rule set cannot fork between them.

use thiserror::Error;
use tracing::trace;

use crate::crypto::keys::{Fingerprint, Key, KeyError, Signature};
use crate::transaction::types::{OutPoint, Transaction, TxId};
use crate::transaction::utxo::UtxoEntry;
use crate::transaction::wire::WireError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a transaction was rejected.
///
/// Every variant names the first check that failed. Parse-level problems
/// with prior transactions ([`ValidationError::PriorTransaction`]) stay
/// distinguishable from rule violations, so callers can tell a corrupt
/// message apart from an attempted invalid spend.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The evidence, key, and signature lists do not line up with the
    /// transaction's inputs.
    #[error(
        "mismatched argument counts: {inputs} inputs, {evidence} evidence entries, \
         {keys} keys, {signatures} signatures"
    )]
    Shape {
        inputs: usize,
        evidence: usize,
        keys: usize,
        signatures: usize,
    },

    /// A prior transaction's bytes do not parse.
    #[error("prior transaction at position {position} is malformed")]
    PriorTransaction {
        position: usize,
        source: WireError,
    },

    /// A prior transaction parses but hashes to a different id than the
    /// input claims.
    #[error("input {position} names prior transaction {claimed} but the supplied bytes hash to {actual}")]
    PriorIdMismatch {
        position: usize,
        claimed: TxId,
        actual: TxId,
    },

    /// An input's index points past the end of its prior transaction's
    /// output list.
    #[error("input {position} wants output {index} of a prior transaction with {available} outputs")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        available: usize,
    },

    /// An evidence entry is for a different outpoint than the input names.
    #[error("evidence at position {position} covers {evidence}, input names {claimed}")]
    EvidenceMismatch {
        position: usize,
        claimed: OutPoint,
        evidence: OutPoint,
    },

    /// An issuing transaction's key is not the configured issuing
    /// authority's key.
    #[error("issuing key does not match the configured master key")]
    MasterKeyMismatch,

    /// A presented key is not the one the consumed output is locked to.
    #[error("key at position {position} has fingerprint {supplied}, output is locked to {expected}")]
    OwnerMismatch {
        position: usize,
        expected: Fingerprint,
        supplied: Fingerprint,
    },

    /// A signature does not verify over this transaction's id.
    #[error("signature at position {position} does not verify")]
    BadSignature { position: usize },

    /// Consumed and produced totals differ.
    #[error("value not conserved: inputs carry {consumed}, outputs claim {produced}")]
    Unbalanced { consumed: u128, produced: u128 },

    /// Key bytes or signature framing that cannot be interpreted at all.
    #[error("invalid key material: {0}")]
    Key(#[from] KeyError),
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verifies a transaction against already-resolved evidence.
///
/// `evidence[i]`, `keys[i]`, and `signatures[i]` belong to
/// `tx.inputs()[i]`: the unspent entry being consumed, the public key
/// claiming it, and that key's signature over this transaction's id. Keys
/// arrive as raw bytes because the issuing check compares encodings, not
/// curve points.
///
/// With no evidence the transaction must be issuing and is checked against
/// `master_key` instead:
///
/// 1. no inputs, exactly one key, exactly one signature,
/// 2. the key bytes equal `master_key` byte for byte,
/// 3. the signature verifies over the transaction id.
///
/// Issued value is not conserved.
///
/// With evidence present, per input position:
///
/// 1. the evidence entry covers the outpoint the input names,
/// 2. the key's fingerprint matches the output's owner,
/// 3. the signature verifies over the transaction id,
///
/// and across the whole transaction the consumed and produced totals must
/// be exactly equal.
///
/// # Errors
///
/// The first failed check is returned; later positions go unexamined.
pub fn verify_with_prior_outputs(
    tx: &Transaction,
    evidence: &[UtxoEntry],
    keys: &[Vec<u8>],
    signatures: &[Signature],
    master_key: &[u8],
) -> Result<(), ValidationError> {
    let tx_id = tx.id();

    if evidence.is_empty() {
        // Issuing path. The shape check runs before any key is touched, so
        // an empty key list reports as a shape problem, not a panic.
        if !tx.inputs().is_empty() || keys.len() != 1 || signatures.len() != 1 {
            return Err(ValidationError::Shape {
                inputs: tx.inputs().len(),
                evidence: 0,
                keys: keys.len(),
                signatures: signatures.len(),
            });
        }
        // Raw byte comparison. A key that names the master point in a
        // different encoding is not the master key.
        if keys[0].as_slice() != master_key {
            return Err(ValidationError::MasterKeyMismatch);
        }
        let key = Key::from_public_bytes(&keys[0])?;
        if !key.verify(tx_id.as_bytes(), &signatures[0])? {
            return Err(ValidationError::BadSignature { position: 0 });
        }
        trace!(tx = %tx_id, "issuing transaction accepted");
        return Ok(());
    }

    let inputs = tx.inputs();
    if evidence.len() != inputs.len()
        || keys.len() != inputs.len()
        || signatures.len() != inputs.len()
    {
        return Err(ValidationError::Shape {
            inputs: inputs.len(),
            evidence: evidence.len(),
            keys: keys.len(),
            signatures: signatures.len(),
        });
    }

    let mut consumed: u128 = 0;
    for (position, input) in inputs.iter().enumerate() {
        let entry = &evidence[position];

        // 1. The evidence must cover the outpoint the input names.
        if entry.outpoint != *input {
            return Err(ValidationError::EvidenceMismatch {
                position,
                claimed: *input,
                evidence: entry.outpoint,
            });
        }

        // 2. The key must be the one the output is locked to.
        let key = Key::from_public_bytes(&keys[position])?;
        let supplied = key.fingerprint();
        if supplied != entry.output.owner {
            return Err(ValidationError::OwnerMismatch {
                position,
                expected: entry.output.owner,
                supplied,
            });
        }

        // 3. The key must have signed this transaction's id.
        if !key.verify(tx_id.as_bytes(), &signatures[position])? {
            return Err(ValidationError::BadSignature { position });
        }

        consumed += u128::from(entry.output.amount);
    }

    // 4. Exact conservation. The u128 totals cannot overflow: u16::MAX
    // records of u64::MAX each still fit with room to spare.
    let produced: u128 = tx.outputs().iter().map(|out| u128::from(out.amount)).sum();
    if consumed != produced {
        return Err(ValidationError::Unbalanced { consumed, produced });
    }

    trace!(tx = %tx_id, inputs = inputs.len(), "spending transaction accepted");
    Ok(())
}

/// Verifies a transaction given the full serialized bytes of each prior
/// transaction instead of pre-resolved evidence.
///
/// `prior_txs[i]` holds the canonical bytes of the transaction that
/// `tx.inputs()[i]` points into. Each prior is checked before its output
/// is looked up:
///
/// 1. the bytes parse as a transaction,
/// 2. they hash to the id the input claims,
/// 3. the input's index lands inside that transaction's output list.
///
/// The resolved evidence then goes through [`verify_with_prior_outputs`]
/// with the same `master_key`, so the two entry points cannot drift apart
/// on issuing or spending rules.
///
/// An empty `prior_txs` means an issuing transaction and delegates
/// directly.
pub fn verify_with_prior_transactions(
    tx: &Transaction,
    prior_txs: &[Vec<u8>],
    keys: &[Vec<u8>],
    signatures: &[Signature],
    master_key: &[u8],
) -> Result<(), ValidationError> {
    if prior_txs.is_empty() {
        return verify_with_prior_outputs(tx, &[], keys, signatures, master_key);
    }

    let inputs = tx.inputs();
    if prior_txs.len() != inputs.len()
        || keys.len() != inputs.len()
        || signatures.len() != inputs.len()
    {
        return Err(ValidationError::Shape {
            inputs: inputs.len(),
            evidence: prior_txs.len(),
            keys: keys.len(),
            signatures: signatures.len(),
        });
    }

    let mut evidence = Vec::with_capacity(inputs.len());
    for (position, (input, raw)) in inputs.iter().zip(prior_txs).enumerate() {
        let prior = Transaction::parse(raw)
            .map_err(|source| ValidationError::PriorTransaction { position, source })?;

        let actual = prior.id();
        if actual != input.tx_id {
            return Err(ValidationError::PriorIdMismatch {
                position,
                claimed: input.tx_id,
                actual,
            });
        }

        let output = prior.outputs().get(input.index as usize).copied().ok_or(
            ValidationError::IndexOutOfRange {
                position,
                index: input.index,
                available: prior.outputs().len(),
            },
        )?;

        evidence.push(UtxoEntry::new(*input, output));
    }

    verify_with_prior_outputs(tx, &evidence, keys, signatures, master_key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
