//! Canonical wire format for transactions.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! [u16 input count][u16 output count]       4-byte header
//! [32-byte tx id][u32 index]                per input, 36 bytes
//! [32-byte owner][u64 amount]               per output, 40 bytes
//! ```
//!
//! Decoding is strict: the buffer must hold exactly the bytes the header
//! announces. Truncation and trailing data are both errors, because the
//! transaction id is the hash of these exact bytes and a forgiving parser
//! would let one transaction answer to several encodings.

use std::cmp::Ordering;

use thiserror::Error;

use crate::config::{
    transaction_wire_size, INPUT_RECORD_LENGTH, OUTPUT_RECORD_LENGTH, TX_HEADER_LENGTH,
};
use crate::transaction::types::{OutPoint, Transaction, TxOutput};

/// Errors from the transaction codec and count bounds.
#[derive(Debug, Error)]
pub enum WireError {
    /// The buffer ends before the bytes its header promises.
    #[error("transaction data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// The buffer continues past the bytes its header promises.
    #[error("trailing data after transaction: expected {expected} bytes, got {actual}")]
    TrailingData { expected: usize, actual: usize },

    /// More inputs than the u16 wire header can count.
    #[error("too many inputs: {count} exceeds the u16 wire header")]
    TooManyInputs { count: usize },

    /// More outputs than the u16 wire header can count.
    #[error("too many outputs: {count} exceeds the u16 wire header")]
    TooManyOutputs { count: usize },
}

/// Encodes a transaction into its canonical byte form.
///
/// Infallible: [`Transaction::new`] already bounded the counts to u16.
pub(crate) fn encode_transaction(tx: &Transaction) -> Vec<u8> {
    let inputs = tx.inputs();
    let outputs = tx.outputs();

    let mut buf = Vec::with_capacity(transaction_wire_size(inputs.len(), outputs.len()));
    buf.extend_from_slice(&(inputs.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(outputs.len() as u16).to_le_bytes());
    for input in inputs {
        buf.extend_from_slice(&input.to_bytes());
    }
    for output in outputs {
        buf.extend_from_slice(&output.to_bytes());
    }
    buf
}

/// Decodes a transaction from canonical bytes, rejecting any length
/// disagreement with the header.
pub(crate) fn decode_transaction(data: &[u8]) -> Result<Transaction, WireError> {
    if data.len() < TX_HEADER_LENGTH {
        return Err(WireError::Truncated {
            expected: TX_HEADER_LENGTH,
            actual: data.len(),
        });
    }
    let input_count = u16::from_le_bytes([data[0], data[1]]) as usize;
    let output_count = u16::from_le_bytes([data[2], data[3]]) as usize;

    let expected = transaction_wire_size(input_count, output_count);
    match data.len().cmp(&expected) {
        Ordering::Less => {
            return Err(WireError::Truncated {
                expected,
                actual: data.len(),
            });
        }
        Ordering::Greater => {
            return Err(WireError::TrailingData {
                expected,
                actual: data.len(),
            });
        }
        Ordering::Equal => {}
    }

    let mut offset = TX_HEADER_LENGTH;
    let mut inputs = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let mut record = [0u8; INPUT_RECORD_LENGTH];
        record.copy_from_slice(&data[offset..offset + INPUT_RECORD_LENGTH]);
        inputs.push(OutPoint::from_bytes(&record));
        offset += INPUT_RECORD_LENGTH;
    }
    let mut outputs = Vec::with_capacity(output_count);
    for _ in 0..output_count {
        let mut record = [0u8; OUTPUT_RECORD_LENGTH];
        record.copy_from_slice(&data[offset..offset + OUTPUT_RECORD_LENGTH]);
        outputs.push(TxOutput::from_bytes(&record));
        offset += OUTPUT_RECORD_LENGTH;
    }

    // Counts came out of u16 header fields, so the bound in `new` holds.
    Transaction::new(inputs, outputs)
}
