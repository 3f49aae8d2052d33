//! # Hashing
//!
//! SHA-256 is the only hash function in the protocol. Transaction ids,
//! key fingerprints, and the digests that get signed are all 32-byte
//! SHA-256 outputs. Resist the urge to add a second, faster hash: the
//! digest is the identity of everything here, and two hash functions
//! means two identities.

use sha2::{Digest, Sha256};

/// SHA-256 digest of `data`, as an owned `Vec<u8>`.
///
/// Convenient where the digest flows into heap-backed buffers. Where the
/// 32-byte width should propagate through the type, use [`sha256_array`].
///
/// # Example
///
/// ```
/// use mintaka_ledger::crypto::sha256;
///
/// let digest = sha256(b"mintaka ledger");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// SHA-256 digest of `data`, as a `[u8; 32]`.
///
/// The array form feeds everything identity-shaped: transaction ids,
/// fingerprints, and the digests handed to the signer.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
