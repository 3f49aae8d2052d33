//! Cryptographic primitives: SHA-256 hashing and secp256k1 key handling.
//!
//! Everything identity-shaped in the ledger bottoms out here. Transaction
//! ids are SHA-256 over canonical bytes ([`hash`]), and output ownership is
//! proven with ECDSA signatures under fingerprinted keys ([`keys`]).

pub mod hash;
pub mod keys;

// Re-export the things people actually need.
pub use hash::{sha256, sha256_array};
pub use keys::{Fingerprint, Key, KeyError, Signature};
