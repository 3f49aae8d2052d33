// Copyright (c) 2026 Mintaka Labs. MIT License.
// See LICENSE for details.

//! # Mintaka Ledger
//!
//! The transaction model and validation core of the Mintaka ledger: a
//! UTXO scheme in which value enters by authority and moves by proof.
//!
//! An issuing transaction, signed by the configured master key, mints
//! outputs from nothing. Every later transaction consumes existing outputs
//! and must carry, per input, the public key the output is locked to and
//! that key's signature over the new transaction's id. Value is conserved
//! exactly on every spend.
//!
//! ## Architecture
//!
//! - [`config`]: protocol constants shared by every module.
//! - [`crypto`]: SHA-256 hashing and secp256k1 keys, fingerprints, and
//!   signatures.
//! - [`transaction`]: the transaction type, its canonical wire form, the
//!   unspent-set bookkeeping, and the validation rules.
//!
//! This crate is deliberately storage- and network-free. It decides
//! whether transactions are valid; where bytes live and how they travel
//! is someone else's layer.

pub mod config;
pub mod crypto;
pub mod transaction;
