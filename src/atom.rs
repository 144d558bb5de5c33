//! The atom capability contract.
//!
//! Every value that takes part in matching or rewriting implements [`Atom`].
//! The list core depends only on this trait, never on concrete atom kinds.
//!
//! Matching is expressed as a lazy stream of candidate outcomes
//! ([`Candidates`]) rather than a boolean, because a single atom may admit
//! several independent ways to bind its variables against a subject. The
//! sequence matcher backtracks by continuing to pull from these streams.
//!
//! # Citations
//! - Matching with variables: Baader & Nipkow, "Term Rewriting and All That", Chapter 4 (1998)
//! - Lazy backtracking via streams: Wadler, "How to replace failure by a list of successes" (1985)

use crate::bindings::Bindings;
use crate::fingerprint::Canonicalizable;
use crate::list::StepBudget;
use crate::outcome::{Failure, MatchOutcome};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Shared, immutable handle to an atom.
pub type AtomRef = Arc<dyn Atom>;

/// Lazy stream of candidate outcomes produced by matching one atom against a subject.
///
/// Each `Ok(MatchOutcome::Matched(b))` item is one way the pattern can match,
/// with `b` the extended bindings. `Ok(MatchOutcome::Failed(f))` items are
/// diagnostics only. An `Err` item aborts the whole match.
pub type Candidates = Box<dyn Iterator<Item = Result<MatchOutcome, AtomError>> + Send>;

/// Capabilities every atom must provide.
///
/// Atoms are immutable. Structural equality is defined by canonical bytes
/// (see [`Canonicalizable`]), and rendering is the atom's canonical textual form.
pub trait Atom: Canonicalizable + fmt::Debug + Send + Sync + 'static {
    /// Deepest bound-variable nesting level referenced within this atom.
    fn de_bruijn_index(&self) -> u32;

    /// Matches this atom, as a pattern, against `subject` under `bindings`.
    ///
    /// Takes `self` by `Arc` so the returned stream can own the pattern and
    /// so failures can cite it.
    fn candidates(self: Arc<Self>, subject: &AtomRef, bindings: &Bindings) -> Candidates;

    /// Like [`candidates`](Atom::candidates), charging nested searches to `budget`.
    ///
    /// Atoms that contain other atoms forward `budget` to them. Leaf atoms
    /// keep the default, which has nothing to charge.
    fn candidates_within(
        self: Arc<Self>,
        subject: &AtomRef,
        bindings: &Bindings,
        _budget: &StepBudget,
    ) -> Candidates {
        self.candidates(subject, bindings)
    }

    /// Substitutes `bindings` into this atom.
    ///
    /// Returns `Ok(None)` when nothing changed, so callers can keep the
    /// original handle.
    fn rewrite(&self, bindings: &Bindings) -> Result<Option<AtomRef>, AtomError>;

    /// Canonical textual rendering.
    fn render(&self) -> String;

    /// Upcast used for kind checks.
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Display for dyn Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Returns true if two atoms are structurally equal.
pub fn atoms_equal(a: &dyn Atom, b: &dyn Atom) -> bool {
    a.to_canonical_bytes() == b.to_canonical_bytes()
}

/// A candidate stream holding exactly one successful outcome.
pub fn matched(bindings: Bindings) -> Candidates {
    Box::new(std::iter::once(Ok::<_, AtomError>(MatchOutcome::Matched(bindings))))
}

/// A candidate stream holding exactly one failure.
pub fn failed(failure: Failure) -> Candidates {
    Box::new(std::iter::once(Ok::<_, AtomError>(MatchOutcome::Failed(failure))))
}

/// Errors raised by an atom's own match or rewrite operation.
///
/// These are not match failures: they abort the enclosing operation and
/// propagate to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomError {
    /// An element could not be rewritten.
    #[error("rewrite of `{atom}` failed: {message}")]
    Rewrite { atom: String, message: String },
    /// An element's match operation raised an error.
    #[error("match of `{atom}` failed: {message}")]
    Match { atom: String, message: String },
    /// Fixed-point rewriting did not settle within the configured rounds.
    #[error("rewrite did not reach a fixed point within {rounds} rounds")]
    RewriteDiverged { rounds: u32 },
}

impl AtomError {
    /// Creates a rewrite error attributed to `atom`.
    pub fn rewrite(atom: &dyn Atom, message: impl Into<String>) -> Self {
        Self::Rewrite {
            atom: atom.render(),
            message: message.into(),
        }
    }

    /// Creates a match error attributed to `atom`.
    pub fn matching(atom: &dyn Atom, message: impl Into<String>) -> Self {
        Self::Match {
            atom: atom.render(),
            message: message.into(),
        }
    }
}
