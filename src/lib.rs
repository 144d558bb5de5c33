//! atomlist: ordered atom lists for a term-rewriting engine.
//!
//! This crate provides the sequence layer of a rewriter:
//! - `AtomList`, an immutable ordered sequence of atoms with a derived De Bruijn index.
//! - Backtracking sequence matching of one list against another under accumulated bindings.
//! - Substitution rewriting that reports whether anything changed, plus a fixed-point driver.
//!
//! Atoms are consumed through the [`Atom`] capability trait. The core never
//! inspects concrete atom kinds; the [`atoms`] module ships a few reference
//! kinds (symbols, variables, the type universe, choice patterns) so lists can
//! be built and exercised on their own.
//!
//! # Matching Model
//!
//! Matching an atom against a subject produces a lazy stream of candidate
//! outcomes rather than a single answer. A list match walks its positions in
//! order, descending on each successful candidate and backtracking into the
//! previous position's stream when a later position runs dry. Bindings are
//! persistent, so every branch of the search carries its own view.
//!
//! # References
//!
//! - de Bruijn, N.G. "Lambda calculus notation with nameless dummies" (1972)
//! - Baader, F., Nipkow, T. "Term Rewriting and All That" (1998) – matching and substitution
//! - Wadler, P. "How to replace failure by a list of successes" (1985) – lazy backtracking
//!
//! # Example
//!
//! ```
//! use atomlist::prelude::*;
//!
//! let pattern = AtomList::new(vec![Symbol::atom("f"), Variable::atom("x")]);
//! let subject = AtomList::new(vec![Symbol::atom("f"), Symbol::atom("a")]).into_atom();
//!
//! let outcome = pattern.match_against(&subject, &Bindings::new()).unwrap();
//! let bindings = outcome.into_bindings().unwrap();
//! assert_eq!(bindings.to_string(), "{$x -> a}");
//!
//! let (rewritten, changed) = pattern.rewrite(&bindings).unwrap();
//! assert!(changed);
//! assert_eq!(rewritten.render(), "f, a");
//! ```

pub mod atom;
pub mod atoms;
pub mod bindings;
pub mod config;
pub mod fingerprint;
pub mod list;
pub mod outcome;

pub use atom::{Atom, AtomError, AtomRef, Candidates};
pub use bindings::{Bindings, VariableName};
pub use config::{ConfigError, MatchConfig, Policy, RewriteConfig};
pub use list::{rewrite_to_fixpoint, AtomList, AtomListError, SequenceMatches, StepBudget};
pub use outcome::{Failure, FailureReason, MatchOutcome};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::atom::{atoms_equal, Atom, AtomError, AtomRef, Candidates};
    pub use crate::atoms::{type_universe, Alternatives, Symbol, TypeUniverse, Variable};
    pub use crate::bindings::{Bindings, VariableName};
    pub use crate::config::{ConfigError, MatchConfig, Policy, RewriteConfig};
    pub use crate::fingerprint::{Canonicalizable, HashValue};
    pub use crate::list::{
        rewrite_to_fixpoint, AtomList, AtomListError, SequenceMatches, StepBudget,
    };
    pub use crate::outcome::{Failure, FailureReason, MatchOutcome};
}
