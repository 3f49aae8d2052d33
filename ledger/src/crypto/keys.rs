//! # Key Management
//!
//! ECDSA key pairs over secp256k1, plus the wire codec for the scalar-pair
//! signature format.
//!
//! A [`Key`] wraps a public point and, optionally, the secret scalar that
//! produced it. Keys built from public bytes can verify but not sign. Keys
//! built from secret bytes can do both, and the public point is re-derived
//! from the scalar so the two can never disagree.
//!
//! ## Why secp256k1?
//!
//! - The on-wire signature is an (r, s) scalar pair, each scalar carried as
//!   a length-prefixed minimal big-endian byte string. That is ECDSA's
//!   native shape; a fixed-form signature scheme cannot express it.
//! - RFC 6979 nonces make signing deterministic, so no RNG is consulted
//!   after key import. Same key, same digest, same signature.
//! - The verifier rejects non-canonical (high-s) signatures, which the
//!   signer never produces in the first place.
//!
//! ## Security considerations
//!
//! - Secret scalars are never logged and never printed by `Debug`.
//! - `Key` does not implement `Serialize`. Exporting secret material is a
//!   deliberate call to [`Key::secret_bytes`], not a side effect of putting
//!   a key in a struct.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{MAX_SIGNATURE_LENGTH, SCALAR_LENGTH};
use crate::crypto::hash::sha256_array;

/// Errors that can occur while importing keys or framing signatures.
///
/// The key variants are deliberately terse: byte-level context about key
/// material belongs in a debugger, not in logs.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid public key bytes: not a SEC1 point on secp256k1")]
    InvalidPublicKey,

    #[error("invalid secret key bytes: not a 32-byte scalar inside the curve order")]
    InvalidSecretKey,

    #[error("signing requires a secret key, this key is public-only")]
    NoSecretKey,

    #[error("malformed signature: {reason}")]
    MalformedSignature { reason: String },
}

/// An ECDSA key pair, or just the public half of one.
///
/// This is the unit of authority in the ledger: transaction outputs are
/// addressed to key fingerprints, and spending an output means producing a
/// signature that verifies under the key behind that fingerprint.
///
/// Construction is the only place key material enters. A key built by
/// [`Key::from_secret_bytes`] derives its public point from the scalar, so
/// a pair can never carry a mismatched point. A key built by
/// [`Key::from_public_bytes`] has no signing capability and says so through
/// [`KeyError::NoSecretKey`] if asked.
///
/// # Examples
///
/// ```
/// use mintaka_ledger::crypto::Key;
///
/// let key = Key::from_secret_bytes(&[7u8; 32]).unwrap();
/// let digest = [42u8; 32];
/// let sig = key.sign(&digest).unwrap();
/// assert!(key.verify(&digest, &sig).unwrap());
/// ```
#[derive(Clone)]
pub struct Key {
    /// The public point, always present.
    verifying: VerifyingKey,
    /// The secret scalar. `None` for verify-only keys.
    signing: Option<SigningKey>,
}

/// Content-addressed identity of a public key.
///
/// The SHA-256 digest of the compressed public point. Transaction outputs
/// record the owner as a fingerprint rather than the point itself, which
/// keeps output records fixed-width and commits the owner to exactly one
/// public key encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

/// An ECDSA signature in the ledger's wire encoding.
///
/// Layout: `[u16 LE length][r][u16 LE length][s]`, where `r` and `s` are
/// minimal big-endian scalar bytes (leading zeros stripped, at most 32
/// bytes each). Total size is at most 68 bytes and depends on the scalar
/// magnitudes.
///
/// The bytes are opaque to everything except [`Key::verify`], which frames
/// and checks them. A `Signature` holding garbage is harmless: verification
/// reports it as malformed or simply false, never as a panic.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Key {
    /// Imports the public half of a key from SEC1 point bytes.
    ///
    /// Accepts the compressed 33-byte form that [`Key::public_bytes`]
    /// exports (the uncompressed 65-byte form also parses, since it names
    /// the same point). The resulting key can verify but not sign.
    pub fn from_public_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let verifying =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self {
            verifying,
            signing: None,
        })
    }

    /// Imports a full key pair from a raw 32-byte secret scalar.
    ///
    /// The public point is re-derived from the scalar, so the pair is
    /// consistent by construction. Rejects the zero scalar and anything at
    /// or beyond the curve order.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let signing = SigningKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        let verifying = *signing.verifying_key();
        Ok(Self {
            verifying,
            signing: Some(signing),
        })
    }

    /// Returns `true` if this key can sign.
    pub fn has_secret(&self) -> bool {
        self.signing.is_some()
    }

    /// Signs a 32-byte digest.
    ///
    /// The digest width is part of the type, so there is no runtime length
    /// check to forget. Callers sign transaction ids, which are already
    /// SHA-256 outputs; this function does not hash again.
    ///
    /// # Errors
    ///
    /// [`KeyError::NoSecretKey`] if the key was built from public bytes.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, KeyError> {
        let signing = self.signing.as_ref().ok_or(KeyError::NoSecretKey)?;
        let sig: EcdsaSignature = signing
            .sign_prehash(digest)
            .map_err(|_| KeyError::InvalidSecretKey)?;
        let (r, s) = sig.split_bytes();

        let mut bytes = Vec::with_capacity(MAX_SIGNATURE_LENGTH);
        encode_scalar(&mut bytes, r.as_slice());
        encode_scalar(&mut bytes, s.as_slice());
        Ok(Signature { bytes })
    }

    /// Verifies a signature over a 32-byte digest.
    ///
    /// Returns `Ok(false)` for any well-framed signature that does not
    /// verify, including scalar values outside the curve order. Returns an
    /// error only when the framing itself is broken: a length prefix over
    /// 32, a buffer shorter than its prefixes declare, or trailing bytes.
    /// Callers can therefore tell "garbage bytes" apart from "a real
    /// signature by the wrong key".
    pub fn verify(&self, digest: &[u8; 32], sig: &Signature) -> Result<bool, KeyError> {
        let (r, rest) = decode_scalar(sig.as_bytes())?;
        let (s, rest) = decode_scalar(rest)?;
        if !rest.is_empty() {
            return Err(KeyError::MalformedSignature {
                reason: format!("{} trailing bytes after the scalar pair", rest.len()),
            });
        }

        // Zero or out-of-range scalars are well-framed but can never have
        // come from a signer. Fail closed.
        let parsed = match EcdsaSignature::from_scalars(r, s) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(false),
        };
        Ok(self.verifying.verify_prehash(digest, &parsed).is_ok())
    }

    /// The fingerprint of the public point, used as the owner identity in
    /// transaction outputs.
    ///
    /// Two keys over the same point always agree on their fingerprint,
    /// whether they were built from secret or public bytes.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(sha256_array(&self.public_bytes()))
    }

    /// Exports the public point as compressed SEC1 bytes (33 bytes).
    ///
    /// This is the byte form the issuing authority is configured with and
    /// the form [`Key::from_public_bytes`] round-trips.
    pub fn public_bytes(&self) -> Vec<u8> {
        self.verifying.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Exports the raw secret scalar, if this key has one.
    ///
    /// Handle with care: whoever holds these bytes owns every output
    /// addressed to this key's fingerprint.
    pub fn secret_bytes(&self) -> Option<Vec<u8>> {
        self.signing
            .as_ref()
            .map(|signing| signing.to_bytes().as_slice().to_vec())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secret material stays out of debug output. Even a prefix of a
        // scalar is a leak.
        write!(
            f,
            "Key(fingerprint={}, secret={})",
            self.fingerprint(),
            self.has_secret()
        )
    }
}

impl PartialEq for Key {
    /// Two keys are equal if they name the same public point. Secret
    /// material is never compared; for identity purposes the point is what
    /// matters, and comparing secrets byte-wise is a habit not worth having.
    fn eq(&self, other: &Self) -> bool {
        self.public_bytes() == other.public_bytes()
    }
}

impl Eq for Key {}

// ---------------------------------------------------------------------------
// Signature framing
// ---------------------------------------------------------------------------

/// Appends one scalar in minimal form: a 2-byte little-endian length, then
/// the big-endian bytes with leading zeros stripped.
fn encode_scalar(buf: &mut Vec<u8>, scalar: &[u8]) {
    let start = scalar
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(scalar.len());
    let minimal = &scalar[start..];
    buf.extend_from_slice(&(minimal.len() as u16).to_le_bytes());
    buf.extend_from_slice(minimal);
}

/// Reads one length-prefixed scalar, left-padding it back to 32 bytes.
/// Returns the padded scalar and the remaining input.
fn decode_scalar(raw: &[u8]) -> Result<([u8; SCALAR_LENGTH], &[u8]), KeyError> {
    if raw.len() < 2 {
        return Err(KeyError::MalformedSignature {
            reason: format!("expected a 2-byte length prefix, {} bytes remain", raw.len()),
        });
    }
    let declared = u16::from_le_bytes([raw[0], raw[1]]) as usize;
    if declared > SCALAR_LENGTH {
        return Err(KeyError::MalformedSignature {
            reason: format!(
                "scalar length {} exceeds the {}-byte curve bound",
                declared, SCALAR_LENGTH
            ),
        });
    }
    let rest = &raw[2..];
    if rest.len() < declared {
        return Err(KeyError::MalformedSignature {
            reason: format!("scalar declares {} bytes, {} remain", declared, rest.len()),
        });
    }
    let mut scalar = [0u8; SCALAR_LENGTH];
    scalar[SCALAR_LENGTH - declared..].copy_from_slice(&rest[..declared]);
    Ok((scalar, &rest[declared..]))
}

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

impl Fingerprint {
    /// Wraps raw digest bytes as a fingerprint.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex form, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses the 64-character hex form back into a fingerprint.
    ///
    /// Anything that is not exactly 32 bytes of valid hex is rejected.
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

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    /// Wraps raw signature bytes.
    ///
    /// No framing check happens here; [`Key::verify`] is the authority on
    /// whether the bytes mean anything.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the encoded signature in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the signature holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex-encoded representation.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parses a hex-encoded signature.
    ///
    /// Rejects anything longer than the 68-byte framing bound.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() > MAX_SIGNATURE_LENGTH {
            return Err(hex::FromHexError::OddLength);
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() > 16 {
            write!(
                f,
                "Signature({}.., {} bytes)",
                &hex_str[..16],
                self.bytes.len()
            )
        } else {
            write!(f, "Signature({})", hex_str)
        }
    }
}
