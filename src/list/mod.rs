//! Ordered atom lists.
//!
//! An [`AtomList`](core::AtomList) is an immutable, fixed-length sequence of
//! atoms with a derived De Bruijn index. This module provides its data
//! structure, the backtracking sequence matcher and the rewrite traversal.
//!
//! # Citations
//! - De Bruijn indices: de Bruijn, "Lambda calculus notation with nameless dummies" (1972)
//! - Backtracking search: Golomb & Baumert, "Backtrack programming" (1965)
//! - Associative-commutative matching with multiple solutions: Eker, "Associative-commutative matching via bipartite graph matching" (1995)
//!
//! # Maintenance Protocol
//!
//! - Canonical bytes: if the byte layout of any atom kind changes, bump the
//!   matching `DOMAIN_*` constant in [`constants`] and update
//!   `core::tests::test_canonical_bytes_golden` intentionally.
//! - Search order: the matcher must keep exploring candidates strictly in
//!   position order, head first. `match_against` relies on the first success
//!   in that order being the reported one.

pub mod budget;
pub mod constants;
pub mod core;
pub mod matcher;
pub mod rewrite;

pub use self::budget::StepBudget;
pub use self::core::{AtomList, AtomListError};
pub use self::matcher::SequenceMatches;
pub use self::rewrite::rewrite_to_fixpoint;
