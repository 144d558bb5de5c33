//! Centralized tags, hash domains, messages and defaults.
//!
//! Canonical bytes of every atom start with one of the `KIND_*` tags. If the
//! canonical byte format changes, bump the corresponding `DOMAIN_*_V*`
//! constant so stale fingerprints can never compare equal to new ones.

/// Canonical-bytes tag for symbols.
pub const KIND_SYMBOL: u8 = 0;

/// Canonical-bytes tag for variables.
pub const KIND_VARIABLE: u8 = 1;

/// Canonical-bytes tag for the type universe.
pub const KIND_TYPE_UNIVERSE: u8 = 2;

/// Canonical-bytes tag for alternatives.
pub const KIND_ALTERNATIVES: u8 = 3;

/// Canonical-bytes tag for atom lists.
pub const KIND_ATOM_LIST: u8 = 4;

/// Leading bytes of every fingerprint input.
pub const FINGERPRINT_PREFIX: &[u8] = b"ATOM:";

/// Fingerprint framing version, hashed after the domain.
pub const FINGERPRINT_VERSION: &[u8] = b":v1";

/// Domain for hashing atom lists (v0).
pub const DOMAIN_ATOM_LIST_V0: &[u8] = b"ATOM_LIST_V0";

/// Domain for hashing bindings (v0).
pub const DOMAIN_BINDINGS_V0: &[u8] = b"BINDINGS_V0";

/// Message for a list match whose subject is not a list.
pub const NOT_A_LIST: &str = "subject is not an ordered list";

/// Message for a list match between lists of different lengths.
pub const SIZE_MISMATCH: &str = "Lists are different sizes.";

/// Separator used when rendering list elements.
pub const RENDER_SEPARATOR: &str = ", ";

/// Default bound on fixed-point rewrite rounds.
pub const DEFAULT_MAX_REWRITE_ROUNDS: u32 = 64;
