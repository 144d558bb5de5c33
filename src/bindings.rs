//! Persistent variable bindings.
//!
//! `Bindings` is an immutable map from variable name to bound atom. Every
//! extension returns a new value that shares structure with the old one, so a
//! backtracking search can hand each branch its own bindings without copying
//! and without one branch ever observing another's tentative extensions.
//!
//! # Citations
//! - Persistent maps: Okasaki, "Purely Functional Data Structures" (1998)
//! - Substitutions: Baader & Snyder, "Unification Theory", Handbook of Automated Reasoning, Section 2 (2001)

use crate::atom::{atoms_equal, AtomRef};
use crate::fingerprint::{write_str, Canonicalizable, HashValue};
use crate::list::constants::DOMAIN_BINDINGS_V0;
use im::OrdMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a pattern variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableName(String);

impl VariableName {
    /// Creates a variable name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariableName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Immutable, persistent mapping from variables to bound atoms.
///
/// Iteration is in variable-name order, which keeps rendering and
/// fingerprints deterministic.
#[derive(Clone, Default)]
pub struct Bindings {
    map: OrdMap<VariableName, AtomRef>,
}

impl Bindings {
    /// Creates empty bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the atom bound to `name`.
    pub fn get(&self, name: &VariableName) -> Option<&AtomRef> {
        self.map.get(name)
    }

    /// Returns whether `name` is bound.
    pub fn contains(&self, name: &VariableName) -> bool {
        self.map.contains_key(name)
    }

    /// Returns new bindings with `name` bound to `atom`.
    ///
    /// An existing binding for `name` is replaced in the result; `self` is
    /// left untouched.
    pub fn bind(&self, name: VariableName, atom: AtomRef) -> Self {
        Self {
            map: self.map.update(name, atom),
        }
    }

    /// Combines two sets of bindings.
    ///
    /// Returns `None` if a variable is bound in both to structurally
    /// different atoms.
    pub fn merge(&self, other: &Bindings) -> Option<Bindings> {
        let mut map = self.map.clone();
        for (name, atom) in other.iter() {
            match map.get(name) {
                Some(existing) if !atoms_equal(&**existing, &**atom) => return None,
                Some(_) => {}
                None => {
                    map.insert(name.clone(), atom.clone());
                }
            }
        }
        Some(Self { map })
    }

    /// Iterates over bindings in variable-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&VariableName, &AtomRef)> + '_ {
        self.map.iter()
    }

    /// Returns the number of bound variables.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Deterministic fingerprint of these bindings.
    pub fn fingerprint(&self) -> HashValue {
        self.fingerprint_in(DOMAIN_BINDINGS_V0)
    }
}

impl Canonicalizable for Bindings {
    fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(self.map.len() as u64).to_le_bytes());
        for (name, atom) in self.map.iter() {
            write_str(buf, name.as_str());
            atom.write_canonical_bytes(buf);
        }
    }
}

impl PartialEq for Bindings {
    fn eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len()
            && self
                .map
                .iter()
                .zip(other.map.iter())
                .all(|((n1, a1), (n2, a2))| n1 == n2 && atoms_equal(&**a1, &**a2))
    }
}

impl Eq for Bindings {}

impl FromIterator<(VariableName, AtomRef)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (VariableName, AtomRef)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.map.iter().map(|(name, atom)| (name.as_str(), atom.render())))
            .finish()
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, atom)) in self.map.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "${} -> {}", name, atom.render())?;
        }
        f.write_str("}")
    }
}
