//! Core data structure for ordered atom lists.
//!
//! Defines `AtomList`, its derived fields and its implementation of the
//! [`Atom`] contract, which lets lists nest inside other lists.

use super::budget::StepBudget;
use super::constants::{DOMAIN_ATOM_LIST_V0, KIND_ATOM_LIST, RENDER_SEPARATOR};
use super::matcher::SequenceMatches;
use crate::atom::{Atom, AtomError, AtomRef, Candidates};
use crate::atoms::type_universe;
use crate::bindings::Bindings;
use crate::config::MatchConfig;
use crate::fingerprint::{Canonicalizable, HashValue};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::sync::Arc;
use thiserror::Error;

/// Error constructing an atom list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomListError {
    /// No element sequence was supplied.
    #[error("invalid argument: an atom list requires an element sequence")]
    MissingAtoms,
}

/// An immutable, ordered, fixed-length sequence of atoms.
///
/// The De Bruijn index and type are fixed at construction. Cloning shares
/// the element buffer, and every transformation produces a new list.
#[derive(Clone)]
pub struct AtomList {
    /// Elements in order.
    atoms: Arc<[AtomRef]>,
    /// Maximum De Bruijn index over the elements (0 when empty).
    de_bruijn_index: u32,
    /// Static type of every atom list: the type universe.
    the_type: AtomRef,
}

impl AtomList {
    /// Creates a list from an ordered sequence of atoms.
    pub fn new(atoms: Vec<AtomRef>) -> Self {
        let de_bruijn_index = atoms
            .iter()
            .map(|atom| atom.de_bruijn_index())
            .max()
            .unwrap_or(0);
        Self {
            atoms: atoms.into(),
            de_bruijn_index,
            the_type: type_universe(),
        }
    }

    /// Creates a list from a sequence that may be absent.
    ///
    /// Fails with [`AtomListError::MissingAtoms`] when `atoms` is `None`.
    pub fn try_new(atoms: Option<Vec<AtomRef>>) -> Result<Self, AtomListError> {
        atoms.map(Self::new).ok_or(AtomListError::MissingAtoms)
    }

    /// Creates an empty list.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Wraps this list as a shared atom handle.
    pub fn into_atom(self) -> AtomRef {
        Arc::new(self)
    }

    /// Returns the elements.
    pub fn atoms(&self) -> &[AtomRef] {
        &self.atoms
    }

    /// Returns the element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&AtomRef> {
        self.atoms.get(index)
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, AtomRef> {
        self.atoms.iter()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Returns true if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Maximum De Bruijn index over all elements, or 0 for an empty list.
    pub fn de_bruijn_index(&self) -> u32 {
        self.de_bruijn_index
    }

    /// Returns the type of this list (the type universe).
    pub fn the_type(&self) -> &AtomRef {
        &self.the_type
    }

    /// Returns true if both lists share the same element buffer.
    ///
    /// This is reference identity, which is stronger than `==`.
    pub fn ptr_eq(a: &AtomList, b: &AtomList) -> bool {
        Arc::ptr_eq(&a.atoms, &b.atoms)
    }

    /// Renders each element joined by `", "`, with no surrounding delimiter.
    ///
    /// Enclosing printers add whatever brackets their context requires.
    pub fn render(&self) -> String {
        self.atoms
            .iter()
            .map(|atom| atom.render())
            .collect::<Vec<_>>()
            .join(RENDER_SEPARATOR)
    }

    /// Deterministic fingerprint of this list.
    pub fn fingerprint(&self) -> HashValue {
        self.fingerprint_in(DOMAIN_ATOM_LIST_V0)
    }

    /// Lazily enumerates every complete match of this list against `subject`.
    ///
    /// See [`SequenceMatches`] for the contract of the yielded items.
    pub fn matches(
        &self,
        subject: &AtomRef,
        bindings: &Bindings,
        config: &MatchConfig,
    ) -> SequenceMatches {
        SequenceMatches::new(Arc::new(self.clone()), subject.clone(), bindings.clone(), config)
    }
}

impl Canonicalizable for AtomList {
    fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(KIND_ATOM_LIST);
        buf.extend_from_slice(&(self.atoms.len() as u64).to_le_bytes());
        for atom in self.atoms.iter() {
            atom.write_canonical_bytes(buf);
        }
    }
}

impl Atom for AtomList {
    fn de_bruijn_index(&self) -> u32 {
        self.de_bruijn_index
    }

    fn candidates(self: Arc<Self>, subject: &AtomRef, bindings: &Bindings) -> Candidates {
        self.candidates_within(subject, bindings, &StepBudget::unbounded())
    }

    fn candidates_within(
        self: Arc<Self>,
        subject: &AtomRef,
        bindings: &Bindings,
        budget: &StepBudget,
    ) -> Candidates {
        Box::new(SequenceMatches::with_budget(
            self,
            subject.clone(),
            bindings.clone(),
            budget.clone(),
        ))
    }

    fn rewrite(&self, bindings: &Bindings) -> Result<Option<AtomRef>, AtomError> {
        let (list, changed) = AtomList::rewrite(self, bindings)?;
        Ok(changed.then(|| list.into_atom()))
    }

    fn render(&self) -> String {
        AtomList::render(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl PartialEq for AtomList {
    fn eq(&self, other: &Self) -> bool {
        AtomList::ptr_eq(self, other)
            || (self.len() == other.len()
                && self
                    .atoms
                    .iter()
                    .zip(other.atoms.iter())
                    .all(|(a, b)| crate::atom::atoms_equal(&**a, &**b)))
    }
}

impl Eq for AtomList {}

impl Hash for AtomList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_canonical_bytes().hash(state);
    }
}

impl Index<usize> for AtomList {
    type Output = AtomRef;

    fn index(&self, index: usize) -> &AtomRef {
        &self.atoms[index]
    }
}

impl From<Vec<AtomRef>> for AtomList {
    fn from(atoms: Vec<AtomRef>) -> Self {
        Self::new(atoms)
    }
}

impl FromIterator<AtomRef> for AtomList {
    fn from_iter<I: IntoIterator<Item = AtomRef>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AtomList {
    type Item = &'a AtomRef;
    type IntoIter = std::slice::Iter<'a, AtomRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

impl fmt::Debug for AtomList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtomList[{}]", AtomList::render(self))
    }
}

impl fmt::Display for AtomList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&AtomList::render(self))
    }
}
