//! Core transaction data model.
//!
//! A [`Transaction`] consumes previously produced outputs and produces new
//! ones. The two record types that cross the wire are [`OutPoint`], a
//! pointer into an earlier transaction's output list, and [`TxOutput`], an
//! amount locked to a key fingerprint. [`TxId`] is the content address of a
//! transaction: the SHA-256 digest of its canonical serialization.
//!
//! `Transaction` fields are private. The only ways to build one are
//! [`Transaction::new`] and [`Transaction::parse`], both of which enforce
//! the u16 count bound that keeps serialization total. Everything
//! downstream can therefore serialize any transaction it is handed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{INPUT_RECORD_LENGTH, MAX_TX_INPUTS, MAX_TX_OUTPUTS, OUTPUT_RECORD_LENGTH};
use crate::crypto::hash::sha256_array;
use crate::crypto::keys::Fingerprint;
use crate::transaction::wire::{self, WireError};

/// Content-addressed transaction identity.
///
/// The SHA-256 digest of the transaction's canonical bytes. Anything that
/// changes the serialization changes the id, and nothing else does. This is
/// also the digest that spend signatures are made over.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId([u8; 32]);

/// A pointer to one output of an earlier transaction.
///
/// `index` counts from zero within that transaction's output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    /// Id of the transaction that produced the output.
    pub tx_id: TxId,
    /// Position of the output within that transaction.
    pub index: u32,
}

/// An amount of value locked to a key fingerprint.
///
/// Whoever can sign under the key behind `owner` can spend this output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxOutput {
    /// Fingerprint of the key allowed to spend this output.
    pub owner: Fingerprint,
    /// Value carried, in the ledger's base unit.
    pub amount: u64,
}

/// A ledger transaction: a list of consumed outpoints and a list of
/// produced outputs.
///
/// With no inputs this is an issuing transaction and only the issuing
/// authority may sign it; with inputs it is a spend and must be covered by
/// one signature per input. Validation lives in
/// [`verification`](crate::transaction::verification); this type only
/// carries the data and its canonical byte form.
#[derive(Debug, Clone)]
pub struct Transaction {
    inputs: Vec<OutPoint>,
    outputs: Vec<TxOutput>,
}

// ---------------------------------------------------------------------------
// TxId
// ---------------------------------------------------------------------------

impl TxId {
    /// Wraps raw digest bytes as a transaction id.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The id as lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a hex string back into an id.
    ///
    /// Rejects malformed hex and any length other than 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::OddLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// OutPoint
// ---------------------------------------------------------------------------

impl OutPoint {
    pub fn new(tx_id: TxId, index: u32) -> Self {
        Self { tx_id, index }
    }

    /// Canonical 36-byte record: the 32-byte id, then the index as a
    /// little-endian u32.
    pub fn to_bytes(&self) -> [u8; INPUT_RECORD_LENGTH] {
        let mut buf = [0u8; INPUT_RECORD_LENGTH];
        buf[..32].copy_from_slice(self.tx_id.as_bytes());
        buf[32..].copy_from_slice(&self.index.to_le_bytes());
        buf
    }

    /// Reads an outpoint back from its canonical record.
    pub fn from_bytes(bytes: &[u8; INPUT_RECORD_LENGTH]) -> Self {
        let mut id = [0u8; 32];
        id.copy_from_slice(&bytes[..32]);
        let index = u32::from_le_bytes([bytes[32], bytes[33], bytes[34], bytes[35]]);
        Self {
            tx_id: TxId::from_bytes(id),
            index,
        }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.index)
    }
}

// ---------------------------------------------------------------------------
// TxOutput
// ---------------------------------------------------------------------------

impl TxOutput {
    pub fn new(owner: Fingerprint, amount: u64) -> Self {
        Self { owner, amount }
    }

    /// Canonical 40-byte record: the 32-byte owner fingerprint, then the
    /// amount as a little-endian u64.
    pub fn to_bytes(&self) -> [u8; OUTPUT_RECORD_LENGTH] {
        let mut buf = [0u8; OUTPUT_RECORD_LENGTH];
        buf[..32].copy_from_slice(self.owner.as_bytes());
        buf[32..].copy_from_slice(&self.amount.to_le_bytes());
        buf
    }

    /// Reads an output back from its canonical record.
    pub fn from_bytes(bytes: &[u8; OUTPUT_RECORD_LENGTH]) -> Self {
        let mut owner = [0u8; 32];
        owner.copy_from_slice(&bytes[..32]);
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&bytes[32..]);
        Self {
            owner: Fingerprint::from_bytes(owner),
            amount: u64::from_le_bytes(amount),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

impl Transaction {
    /// Builds a transaction from its inputs and outputs.
    ///
    /// Rejects lists longer than the u16 wire header can count. Past this
    /// point serialization cannot fail, which is what lets [`Transaction::id`]
    /// be infallible.
    pub fn new(inputs: Vec<OutPoint>, outputs: Vec<TxOutput>) -> Result<Self, WireError> {
        if inputs.len() > MAX_TX_INPUTS {
            return Err(WireError::TooManyInputs {
                count: inputs.len(),
            });
        }
        if outputs.len() > MAX_TX_OUTPUTS {
            return Err(WireError::TooManyOutputs {
                count: outputs.len(),
            });
        }
        Ok(Self { inputs, outputs })
    }

    /// The outpoints this transaction consumes.
    pub fn inputs(&self) -> &[OutPoint] {
        &self.inputs
    }

    /// The outputs this transaction produces.
    pub fn outputs(&self) -> &[TxOutput] {
        &self.outputs
    }

    /// Returns `true` for an issuing transaction, one that consumes nothing
    /// and mints its outputs from the issuing authority.
    pub fn is_issuing(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Serializes to canonical wire bytes.
    ///
    /// The same logical transaction always produces the same bytes, which
    /// is what makes [`Transaction::id`] an identity.
    pub fn serialize(&self) -> Vec<u8> {
        wire::encode_transaction(self)
    }

    /// Parses a transaction from wire bytes.
    ///
    /// Strict in both directions: truncated input and trailing bytes are
    /// both rejected. The id is the hash of the exact bytes, so accepting
    /// sloppy framing would let one transaction answer to two encodings.
    pub fn parse(data: &[u8]) -> Result<Self, WireError> {
        wire::decode_transaction(data)
    }

    /// The content address of this transaction.
    ///
    /// Computed on demand as SHA-256 over [`Transaction::serialize`]. This
    /// is also the digest that spend signatures cover.
    pub fn id(&self) -> TxId {
        TxId::from_bytes(sha256_array(&self.serialize()))
    }
}

impl PartialEq for Transaction {
    /// Equality follows identity: two transactions are equal when their ids
    /// are. Since the id hashes every field through the canonical bytes,
    /// this agrees with field-by-field comparison while keeping one notion
    /// of sameness in the codebase.
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Transaction {}
