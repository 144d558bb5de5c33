//! Match outcomes and failure diagnostics.
//!
//! A failed match is a normal result, not an error: it carries a reason and
//! the pair of atoms that could not be reconciled, for reporting only.

use crate::atom::AtomRef;
use crate::bindings::Bindings;
use crate::list::constants::{NOT_A_LIST, SIZE_MISMATCH};
use std::fmt;
use thiserror::Error;

/// Result of a match attempt.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// The pattern matched; carries the resulting bindings.
    Matched(Bindings),
    /// The pattern did not match.
    Failed(Failure),
}

impl MatchOutcome {
    /// Returns true for `Matched`.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Returns the bindings of a successful match.
    pub fn bindings(&self) -> Option<&Bindings> {
        match self {
            Self::Matched(bindings) => Some(bindings),
            Self::Failed(_) => None,
        }
    }

    /// Returns the failure of an unsuccessful match.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Matched(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Converts into the bindings of a successful match.
    pub fn into_bindings(self) -> Option<Bindings> {
        match self {
            Self::Matched(bindings) => Some(bindings),
            Self::Failed(_) => None,
        }
    }
}

/// Why a match failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The subject of a list match was some other kind of atom.
    #[error("{}", NOT_A_LIST)]
    NotAList,
    /// The two lists have different lengths.
    #[error("{} (expected {expected}, found {found})", SIZE_MISMATCH)]
    SizeMismatch { expected: usize, found: usize },
    /// The two atoms cannot be reconciled.
    #[error("atoms do not match")]
    Mismatch,
    /// A variable is already bound to a different atom.
    #[error("variable `{variable}` is already bound to a different atom")]
    Conflict { variable: String },
    /// A pattern produced no candidates at all.
    #[error("no candidate match")]
    NoCandidates,
    /// The configured search budget ran out.
    #[error("search budget exhausted after {steps} steps")]
    BudgetExhausted { steps: u64 },
}

/// Diagnostic for a failed match.
///
/// `path` locates the failing pair: each entry is a position within an
/// enclosing atom list, outermost first. It is empty when the failure
/// concerns the top-level atoms themselves.
#[derive(Clone)]
pub struct Failure {
    reason: FailureReason,
    pattern: AtomRef,
    subject: AtomRef,
    path: Vec<usize>,
}

impl Failure {
    /// Creates a failure citing `pattern` and `subject`.
    pub fn new(reason: FailureReason, pattern: AtomRef, subject: AtomRef) -> Self {
        Self {
            reason,
            pattern,
            subject,
            path: Vec::new(),
        }
    }

    /// Returns the reason.
    pub fn reason(&self) -> &FailureReason {
        &self.reason
    }

    /// Returns the pattern-side atom of the failing pair.
    pub fn pattern(&self) -> &AtomRef {
        &self.pattern
    }

    /// Returns the subject-side atom of the failing pair.
    pub fn subject(&self) -> &AtomRef {
        &self.subject
    }

    /// Returns the position path of the failing pair.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Re-roots this failure under position `index` of an enclosing list.
    pub fn at(mut self, index: usize) -> Self {
        self.path.insert(0, index);
        self
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("reason", &self.reason)
            .field("pattern", &self.pattern.render())
            .field("subject", &self.subject.render())
            .field("path", &self.path)
            .finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: `{}` vs `{}`",
            self.reason,
            self.pattern.render(),
            self.subject.render()
        )?;
        if !self.path.is_empty() {
            write!(f, " at {:?}", self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::Symbol;

    #[test]
    fn test_failure_path_is_outermost_first() {
        let f = Failure::new(FailureReason::Mismatch, Symbol::atom("b"), Symbol::atom("c"))
            .at(2)
            .at(0);
        assert_eq!(f.path(), &[0, 2]);
        assert_eq!(f.to_string(), "atoms do not match: `b` vs `c` at [0, 2]");
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(FailureReason::NotAList.to_string(), "subject is not an ordered list");
        assert_eq!(
            FailureReason::SizeMismatch { expected: 2, found: 3 }.to_string(),
            "Lists are different sizes. (expected 2, found 3)"
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = MatchOutcome::Matched(Bindings::new());
        assert!(ok.is_match());
        assert!(ok.bindings().is_some());
        assert!(ok.failure().is_none());

        let bad = MatchOutcome::Failed(Failure::new(
            FailureReason::NoCandidates,
            Symbol::atom("a"),
            Symbol::atom("b"),
        ));
        assert!(!bad.is_match());
        assert!(bad.clone().into_bindings().is_none());
        assert_eq!(bad.failure().map(|f| f.reason()), Some(&FailureReason::NoCandidates));
    }
}
