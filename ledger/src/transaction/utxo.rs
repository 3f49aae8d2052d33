//! Unspent-output bookkeeping.
//!
//! Validation answers "is this transaction internally sound"; the unspent
//! set answers "do the outputs it spends still exist". This module carries
//! the types that bridge the two. A [`UtxoEntry`] pairs an outpoint with
//! the output it points at, which is exactly the evidence shape
//! [`verify_with_prior_outputs`](crate::transaction::verification::verify_with_prior_outputs)
//! consumes. A [`UtxoDiff`] is the delta a validated transaction applies to
//! the unspent set.

use serde::{Deserialize, Serialize};

use crate::config::{INPUT_RECORD_LENGTH, OUTPUT_RECORD_LENGTH};
use crate::transaction::types::{OutPoint, Transaction, TxOutput};

/// One live entry of the unspent set: an outpoint and the output it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoEntry {
    /// Where the output came from.
    pub outpoint: OutPoint,
    /// The output itself.
    pub output: TxOutput,
}

/// The change a transaction makes to the unspent set: entries it creates
/// and outpoints it consumes.
///
/// A store applies the deletions and insertions together or not at all;
/// this type just states them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoDiff {
    /// Entries the transaction creates.
    pub to_add: Vec<UtxoEntry>,
    /// Outpoints the transaction consumes.
    pub to_del: Vec<OutPoint>,
}

impl UtxoEntry {
    pub fn new(outpoint: OutPoint, output: TxOutput) -> Self {
        Self { outpoint, output }
    }

    /// Fixed-width key for a flat keyed store: the 36-byte outpoint record.
    pub fn storage_key(&self) -> [u8; INPUT_RECORD_LENGTH] {
        self.outpoint.to_bytes()
    }

    /// Fixed-width value for a flat keyed store: the 40-byte output record.
    ///
    /// Key and value reuse the wire record codecs, so a store can be walked
    /// and rebuilt with the same code that frames transactions.
    pub fn storage_value(&self) -> [u8; OUTPUT_RECORD_LENGTH] {
        self.output.to_bytes()
    }
}

impl Transaction {
    /// The outpoints this transaction removes from the unspent set, in
    /// input order. Empty for an issuing transaction.
    pub fn consumed_entries(&self) -> Vec<OutPoint> {
        self.inputs().to_vec()
    }

    /// The entries this transaction adds to the unspent set: one per
    /// output, keyed by this transaction's id and the output's position.
    pub fn produced_entries(&self) -> Vec<UtxoEntry> {
        let id = self.id();
        self.outputs()
            .iter()
            .enumerate()
            .map(|(index, output)| UtxoEntry::new(OutPoint::new(id, index as u32), *output))
            .collect()
    }

    /// The full delta this transaction applies to the unspent set.
    pub fn utxo_diff(&self) -> UtxoDiff {
        UtxoDiff {
            to_add: self.produced_entries(),
            to_del: self.consumed_entries(),
        }
    }
}
