//! Reference atom kinds.
//!
//! These are the minimal element types needed to build and exercise atom
//! lists: symbols, pattern variables, the type universe and a choice pattern.
//! The list core never names them; it only sees [`Atom`].

use crate::atom::{atoms_equal, failed, matched, Atom, AtomError, AtomRef, Candidates};
use crate::bindings::{Bindings, VariableName};
use crate::fingerprint::{write_str, Canonicalizable};
use crate::list::constants::{KIND_ALTERNATIVES, KIND_SYMBOL, KIND_TYPE_UNIVERSE, KIND_VARIABLE};
use crate::list::StepBudget;
use crate::outcome::{Failure, FailureReason};
use std::any::Any;
use std::sync::{Arc, OnceLock};

/// A constant atom identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Creates a symbol as a shared atom handle.
    pub fn atom(name: impl Into<String>) -> AtomRef {
        Arc::new(Self::new(name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Canonicalizable for Symbol {
    fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(KIND_SYMBOL);
        write_str(buf, &self.name);
    }
}

impl Atom for Symbol {
    fn de_bruijn_index(&self) -> u32 {
        0
    }

    fn candidates(self: Arc<Self>, subject: &AtomRef, bindings: &Bindings) -> Candidates {
        let same = subject
            .as_any()
            .downcast_ref::<Symbol>()
            .is_some_and(|other| other.name == self.name);
        if same {
            matched(bindings.clone())
        } else {
            failed(Failure::new(FailureReason::Mismatch, self, subject.clone()))
        }
    }

    fn rewrite(&self, _bindings: &Bindings) -> Result<Option<AtomRef>, AtomError> {
        Ok(None)
    }

    fn render(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A pattern variable.
///
/// Unbound, it matches any subject and binds to it. Bound, it matches only
/// a subject structurally equal to its binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: VariableName,
    de_bruijn_index: u32,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: VariableName::new(name),
            de_bruijn_index: 0,
        }
    }

    /// Creates a free variable as a shared atom handle.
    pub fn atom(name: impl Into<String>) -> AtomRef {
        Arc::new(Self::new(name))
    }

    /// Creates a variable bound `index` binders out, as a shared atom handle.
    pub fn with_de_bruijn_index(name: impl Into<String>, index: u32) -> AtomRef {
        Arc::new(Self {
            name: VariableName::new(name),
            de_bruijn_index: index,
        })
    }

    pub fn name(&self) -> &VariableName {
        &self.name
    }
}

impl Canonicalizable for Variable {
    fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(KIND_VARIABLE);
        write_str(buf, self.name.as_str());
        buf.extend_from_slice(&self.de_bruijn_index.to_le_bytes());
    }
}

impl Atom for Variable {
    fn de_bruijn_index(&self) -> u32 {
        self.de_bruijn_index
    }

    fn candidates(self: Arc<Self>, subject: &AtomRef, bindings: &Bindings) -> Candidates {
        match bindings.get(&self.name) {
            None => matched(bindings.bind(self.name.clone(), subject.clone())),
            Some(bound) if atoms_equal(&**bound, &**subject) => matched(bindings.clone()),
            Some(_) => {
                let reason = FailureReason::Conflict {
                    variable: self.name.to_string(),
                };
                failed(Failure::new(reason, self, subject.clone()))
            }
        }
    }

    fn rewrite(&self, bindings: &Bindings) -> Result<Option<AtomRef>, AtomError> {
        Ok(bindings
            .get(&self.name)
            .filter(|bound| !atoms_equal(&***bound, self))
            .cloned())
    }

    fn render(&self) -> String {
        format!("${}", self.name)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The type of all types. Every atom list has this as its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeUniverse;

static TYPE_UNIVERSE: OnceLock<AtomRef> = OnceLock::new();

/// Returns the shared type-universe atom.
pub fn type_universe() -> AtomRef {
    TYPE_UNIVERSE
        .get_or_init(|| Arc::new(TypeUniverse))
        .clone()
}

impl Canonicalizable for TypeUniverse {
    fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(KIND_TYPE_UNIVERSE);
    }
}

impl Atom for TypeUniverse {
    fn de_bruijn_index(&self) -> u32 {
        0
    }

    fn candidates(self: Arc<Self>, subject: &AtomRef, bindings: &Bindings) -> Candidates {
        if subject.as_any().is::<TypeUniverse>() {
            matched(bindings.clone())
        } else {
            failed(Failure::new(FailureReason::Mismatch, self, subject.clone()))
        }
    }

    fn rewrite(&self, _bindings: &Bindings) -> Result<Option<AtomRef>, AtomError> {
        Ok(None)
    }

    fn render(&self) -> String {
        "^TYPE".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A choice pattern: matches wherever any of its alternatives matches.
///
/// Candidates are produced alternative by alternative, in order, so a single
/// position can offer several independent ways to match.
#[derive(Debug, Clone)]
pub struct Alternatives {
    alternatives: Vec<AtomRef>,
    de_bruijn_index: u32,
}

impl Alternatives {
    pub fn new(alternatives: Vec<AtomRef>) -> Self {
        let de_bruijn_index = alternatives
            .iter()
            .map(|alt| alt.de_bruijn_index())
            .max()
            .unwrap_or(0);
        Self {
            alternatives,
            de_bruijn_index,
        }
    }

    /// Creates a choice pattern as a shared atom handle.
    pub fn atom(alternatives: Vec<AtomRef>) -> AtomRef {
        Arc::new(Self::new(alternatives))
    }

    pub fn alternatives(&self) -> &[AtomRef] {
        &self.alternatives
    }
}

impl Canonicalizable for Alternatives {
    fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(KIND_ALTERNATIVES);
        buf.extend_from_slice(&(self.alternatives.len() as u64).to_le_bytes());
        for alt in &self.alternatives {
            alt.write_canonical_bytes(buf);
        }
    }
}

impl Atom for Alternatives {
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
        let subject = subject.clone();
        let bindings = bindings.clone();
        let budget = budget.clone();
        Box::new(
            self.alternatives
                .clone()
                .into_iter()
                .flat_map(move |alt| alt.candidates_within(&subject, &bindings, &budget)),
        )
    }

    fn rewrite(&self, bindings: &Bindings) -> Result<Option<AtomRef>, AtomError> {
        let mut changed = false;
        let mut rewritten = Vec::with_capacity(self.alternatives.len());
        for alt in &self.alternatives {
            match alt.rewrite(bindings)? {
                Some(new_alt) => {
                    changed = true;
                    rewritten.push(new_alt);
                }
                None => rewritten.push(alt.clone()),
            }
        }
        Ok(changed.then(|| Alternatives::atom(rewritten)))
    }

    fn render(&self) -> String {
        self.alternatives
            .iter()
            .map(|alt| alt.render())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(candidates: Candidates) -> crate::outcome::MatchOutcome {
        candidates
            .into_iter()
            .next()
            .expect("at least one candidate")
            .expect("no error")
    }

    #[test]
    fn test_symbol_matches_only_equal_symbol() {
        let a = Symbol::atom("a");
        assert!(first(a.clone().candidates(&Symbol::atom("a"), &Bindings::new())).is_match());
        let outcome = first(a.clone().candidates(&Symbol::atom("b"), &Bindings::new()));
        assert_eq!(outcome.failure().map(|f| f.reason()), Some(&FailureReason::Mismatch));
        let outcome = first(a.candidates(&Variable::atom("a"), &Bindings::new()));
        assert!(!outcome.is_match(), "a symbol never matches a variable subject");
    }

    #[test]
    fn test_variable_binds_then_checks() {
        let x = Variable::atom("x");
        let outcome = first(x.clone().candidates(&Symbol::atom("a"), &Bindings::new()));
        let bindings = outcome.into_bindings().expect("free variable binds");
        assert_eq!(bindings.to_string(), "{$x -> a}");

        assert!(first(x.clone().candidates(&Symbol::atom("a"), &bindings)).is_match());
        let outcome = first(x.candidates(&Symbol::atom("b"), &bindings));
        assert_eq!(
            outcome.failure().map(|f| f.reason().clone()),
            Some(FailureReason::Conflict {
                variable: "x".to_string()
            })
        );
    }

    #[test]
    fn test_variable_rewrite() {
        let x = Variable::atom("x");
        let k = Symbol::atom("K");
        let bindings = Bindings::new().bind(VariableName::new("x"), k.clone());
        let rewritten = x.rewrite(&bindings).unwrap().expect("bound variable is replaced");
        assert!(Arc::ptr_eq(&rewritten, &k));
        assert!(x.rewrite(&Bindings::new()).unwrap().is_none());

        let self_bound = Bindings::new().bind(VariableName::new("x"), x.clone());
        assert!(x.rewrite(&self_bound).unwrap().is_none());
    }

    #[test]
    fn test_type_universe_singleton() {
        let t1 = type_universe();
        let t2 = type_universe();
        assert!(Arc::ptr_eq(&t1, &t2));
        assert_eq!(t1.render(), "^TYPE");
        assert!(first(t1.candidates(&t2, &Bindings::new())).is_match());
    }

    #[test]
    fn test_alternatives_yield_in_order() {
        let alt = Alternatives::atom(vec![Variable::atom("x"), Symbol::atom("a"), Symbol::atom("z")]);
        assert_eq!(alt.render(), "$x | a | z");
        let outcomes: Vec<_> = alt
            .candidates(&Symbol::atom("a"), &Bindings::new())
            .map(|item| item.unwrap())
            .collect();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].bindings().map(|b| b.len()), Some(1));
        assert_eq!(outcomes[1].bindings().map(|b| b.len()), Some(0));
        assert!(!outcomes[2].is_match());
    }

    #[test]
    fn test_alternatives_rewrite_and_index() {
        let alt = Alternatives::atom(vec![
            Variable::with_de_bruijn_index("x", 3),
            Symbol::atom("b"),
        ]);
        assert_eq!(alt.de_bruijn_index(), 3);
        let bindings = Bindings::new().bind(VariableName::new("y"), Symbol::atom("c"));
        assert!(alt.rewrite(&bindings).unwrap().is_none());
    }
}
