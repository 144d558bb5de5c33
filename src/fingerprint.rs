//! Deterministic fingerprints for atoms, atom lists and bindings.
//!
//! Every fingerprint is a domain-separated, length-prefixed SHA-256 digest of
//! a value's canonical bytes, so two structurally equal values always hash
//! identically across runs and processes.
//!
//! # Citations
//! - SHA-256: NIST FIPS 180-4 (2015)
//! - Domain separation & length prefixing: Bernstein et al., "How to hash into elliptic curves" (2009)

use crate::list::constants::{FINGERPRINT_PREFIX, FINGERPRINT_VERSION};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of a value's canonical bytes under a hash domain.
///
/// Produced by [`HashValue::digest`], usually through
/// [`Canonicalizable::fingerprint_in`]. The raw bytes are not exposed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue([u8; 32]);

impl HashValue {
    /// Digests `data` under `domain`.
    ///
    /// Input framing: prefix, domain, version, `len(data)` as u64 LE, data.
    pub fn digest(domain: &[u8], data: &[u8]) -> Self {
        let digest = Sha256::new()
            .chain_update(FINGERPRINT_PREFIX)
            .chain_update(domain)
            .chain_update(FINGERPRINT_VERSION)
            .chain_update((data.len() as u64).to_le_bytes())
            .chain_update(data)
            .finalize();
        Self(digest.into())
    }
}

impl fmt::LowerHex for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

/// Short form for logs: the first eight hex digits.
impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0[..4].iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({self})")
    }
}

/// Types with a canonical byte serialization.
///
/// Canonical bytes are the basis of structural equality between atoms: two
/// atoms are equal exactly when their canonical bytes are equal.
pub trait Canonicalizable {
    /// Appends the canonical byte representation to `buf`.
    fn write_canonical_bytes(&self, buf: &mut Vec<u8>);

    /// Serialize to canonical byte representation.
    fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_canonical_bytes(&mut buf);
        buf
    }

    /// Compute domain-separated hash of canonical bytes.
    fn fingerprint_in(&self, domain: &[u8]) -> HashValue {
        HashValue::digest(domain, &self.to_canonical_bytes())
    }
}

/// Writes a length-prefixed UTF-8 string.
pub(crate) fn write_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}
