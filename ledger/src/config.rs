//! # Protocol Constants
//!
//! Every fixed width and magic number of the wire format lives here. The
//! transaction encoding is a hash-identity contract: if any of these values
//! drift, every transaction id on disk changes with them. Treat edits to this
//! file the way you would treat rewriting history.

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// ECDSA over secp256k1. The signature is an (r, s) scalar pair, which is
/// exactly the shape the wire format carries. Deterministic nonces (RFC 6979)
/// come from the backing implementation, so signing needs no RNG.
pub const SIGNING_ALGORITHM: &str = "ECDSA/secp256k1";

/// Secret keys are raw 32-byte big-endian scalars in [1, n-1].
pub const SECRET_KEY_LENGTH: usize = 32;

/// Public keys are exported in compressed SEC1 form: a parity byte plus the
/// 32-byte x coordinate.
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// An ECDSA scalar (r or s) never exceeds 32 bytes for a 256-bit curve.
/// The signature codec rejects any length prefix claiming otherwise.
pub const SCALAR_LENGTH: usize = 32;

/// Each scalar in a signature is prefixed by its own 2-byte little-endian
/// length, and leading zero bytes are not encoded. Worst case both scalars
/// need all 32 bytes: 2 + 32 + 2 + 32.
pub const MAX_SIGNATURE_LENGTH: usize = 68;

/// SHA-256 everywhere a digest is needed: transaction ids, key fingerprints,
/// and the 32-byte messages that get signed. One hash function, one output
/// width, no negotiation.
pub const HASH_FUNCTION: &str = "SHA-256";

/// Digest width shared by transaction ids and key fingerprints.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Wire Format
// ---------------------------------------------------------------------------

/// Transaction header: two little-endian u16 counts, inputs then outputs.
pub const TX_HEADER_LENGTH: usize = 4;

/// One input record: 32-byte prior transaction id + 4-byte output index.
pub const INPUT_RECORD_LENGTH: usize = 36;

/// One output record: 32-byte owner fingerprint + 8-byte amount.
pub const OUTPUT_RECORD_LENGTH: usize = 40;

/// The header counts are u16, so a transaction can never reference more
/// inputs than this. Enforced at construction, not at serialization.
pub const MAX_TX_INPUTS: usize = u16::MAX as usize;

/// Same bound for outputs, for the same header reason.
pub const MAX_TX_OUTPUTS: usize = u16::MAX as usize;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Exact serialized size of a transaction with the given record counts.
///
/// There is no padding and no trailing data, so this is an equality the
/// parser enforces, not an estimate.
pub fn transaction_wire_size(inputs: usize, outputs: usize) -> usize {
    TX_HEADER_LENGTH + INPUT_RECORD_LENGTH * inputs + OUTPUT_RECORD_LENGTH * outputs
}
