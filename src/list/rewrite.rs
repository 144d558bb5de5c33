//! Substitution of bindings into atom lists.
//!
//! Rewriting is a single structural pass that never backtracks. Elements are
//! visited front to back, each exactly once. A new element buffer is only
//! allocated once some element actually changes; an unchanged list comes back
//! sharing its original buffer.

use super::core::AtomList;
use crate::atom::{AtomError, AtomRef};
use crate::bindings::Bindings;
use crate::config::RewriteConfig;

impl AtomList {
    /// Substitutes `bindings` into every element, left to right.
    ///
    /// Returns the rewritten list and whether any element changed. When
    /// nothing changed the result is [`ptr_eq`](AtomList::ptr_eq) to `self`.
    /// The first element error aborts the rewrite and is returned as-is.
    pub fn rewrite(&self, bindings: &Bindings) -> Result<(AtomList, bool), AtomError> {
        let mut rewritten: Option<Vec<AtomRef>> = None;
        for (i, atom) in self.iter().enumerate() {
            match atom.rewrite(bindings)? {
                Some(new_atom) => rewritten
                    .get_or_insert_with(|| {
                        let mut out = Vec::with_capacity(self.len());
                        out.extend_from_slice(&self.atoms()[..i]);
                        out
                    })
                    .push(new_atom),
                None => {
                    if let Some(out) = rewritten.as_mut() {
                        out.push(atom.clone());
                    }
                }
            }
        }
        Ok(match rewritten {
            Some(atoms) => (AtomList::new(atoms), true),
            None => (self.clone(), false),
        })
    }
}

/// Rewrites `list` until a pass leaves it unchanged.
///
/// Returns the settled list together with the number of passes that changed
/// it. Fails with [`AtomError::RewriteDiverged`] once more than
/// `config.max_rounds` passes have changed the list.
pub fn rewrite_to_fixpoint(
    list: &AtomList,
    bindings: &Bindings,
    config: &RewriteConfig,
) -> Result<(AtomList, u32), AtomError> {
    let mut current = list.clone();
    let mut rounds = 0u32;
    loop {
        let (next, changed) = current.rewrite(bindings)?;
        if !changed {
            return Ok((current, rounds));
        }
        rounds += 1;
        tracing::trace!(round = rounds, list = %next, "rewrite round changed list");
        if rounds > config.max_rounds {
            tracing::debug!(max_rounds = config.max_rounds, "rewrite did not settle");
            return Err(AtomError::RewriteDiverged {
                rounds: config.max_rounds,
            });
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{failed, Atom, Candidates};
    use crate::atoms::{Symbol, Variable};
    use crate::bindings::VariableName;
    use crate::fingerprint::Canonicalizable;
    use crate::outcome::{Failure, FailureReason};
    use proptest::prelude::*;
    use std::any::Any;
    use std::sync::{Arc, Mutex};

    fn sym(name: &str) -> AtomRef {
        Symbol::atom(name)
    }

    fn var(name: &str) -> AtomRef {
        Variable::atom(name)
    }

    fn bind(pairs: &[(&str, AtomRef)]) -> Bindings {
        pairs
            .iter()
            .map(|(name, atom)| (VariableName::new(*name), atom.clone()))
            .collect()
    }

    /// Atom that logs every rewrite call and optionally fails.
    #[derive(Debug)]
    struct Recorder {
        id: usize,
        fail: bool,
        log: Arc<Mutex<Vec<usize>>>,
    }

    impl Canonicalizable for Recorder {
        fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
            buf.push(0xF2);
            buf.extend_from_slice(&(self.id as u64).to_le_bytes());
        }
    }

    impl Atom for Recorder {
        fn de_bruijn_index(&self) -> u32 {
            0
        }

        fn candidates(self: Arc<Self>, subject: &AtomRef, _bindings: &Bindings) -> Candidates {
            failed(Failure::new(FailureReason::Mismatch, self, subject.clone()))
        }

        fn rewrite(&self, _bindings: &Bindings) -> Result<Option<AtomRef>, AtomError> {
            self.log.lock().unwrap().push(self.id);
            if self.fail {
                Err(AtomError::rewrite(self, "unsupported substitution"))
            } else {
                Ok(None)
            }
        }

        fn render(&self) -> String {
            format!("rec{}", self.id)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn recorder(id: usize, fail: bool, log: &Arc<Mutex<Vec<usize>>>) -> AtomRef {
        Arc::new(Recorder {
            id,
            fail,
            log: log.clone(),
        })
    }

    #[test]
    fn test_rewrite_substitutes_bound_variable() {
        let k = sym("K");
        let list = AtomList::new(vec![var("v")]);
        let (rewritten, changed) = list.rewrite(&bind(&[("v", k.clone())])).unwrap();
        assert!(changed);
        assert_eq!(rewritten.len(), 1);
        assert!(Arc::ptr_eq(&rewritten[0], &k));
        assert_eq!(rewritten, AtomList::new(vec![sym("K")]));
    }

    #[test]
    fn test_unchanged_rewrite_returns_same_list() {
        let list = AtomList::new(vec![sym("a"), var("free")]);
        let (rewritten, changed) = list.rewrite(&bind(&[("other", sym("z"))])).unwrap();
        assert!(!changed);
        assert!(AtomList::ptr_eq(&list, &rewritten));

        let empty = AtomList::empty();
        let (rewritten, changed) = empty.rewrite(&Bindings::new()).unwrap();
        assert!(!changed);
        assert!(AtomList::ptr_eq(&empty, &rewritten));
    }

    #[test]
    fn test_unchanged_prefix_is_shared_into_new_list() {
        let a = sym("a");
        let list = AtomList::new(vec![a.clone(), var("x"), sym("c")]);
        let (rewritten, changed) = list.rewrite(&bind(&[("x", sym("b"))])).unwrap();
        assert!(changed);
        assert!(!AtomList::ptr_eq(&list, &rewritten));
        assert!(Arc::ptr_eq(&rewritten[0], &a));
        assert!(Arc::ptr_eq(&rewritten[2], &list[2]));
        assert_eq!(rewritten.render(), "a, b, c");
    }

    #[test]
    fn test_visits_every_element_left_to_right() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let list = AtomList::new(vec![
            recorder(0, false, &log),
            recorder(1, false, &log),
            recorder(2, false, &log),
        ]);
        list.rewrite(&Bindings::new()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_element_error_propagates_unchanged() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let list = AtomList::new(vec![
            recorder(0, false, &log),
            recorder(1, true, &log),
            recorder(2, false, &log),
        ]);
        let err = list.rewrite(&Bindings::new()).unwrap_err();
        assert_eq!(
            err,
            AtomError::Rewrite {
                atom: "rec1".to_string(),
                message: "unsupported substitution".to_string(),
            }
        );
        assert_eq!(*log.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_nested_lists_rewrite_through_atom_contract() {
        let inner = AtomList::new(vec![var("x")]).into_atom();
        let list = AtomList::new(vec![sym("f"), inner]);
        let (rewritten, changed) = list.rewrite(&bind(&[("x", sym("a"))])).unwrap();
        assert!(changed);
        assert_eq!(
            rewritten,
            AtomList::new(vec![sym("f"), AtomList::new(vec![sym("a")]).into_atom()])
        );
    }

    #[test]
    fn test_fixpoint_follows_chains() {
        let list = AtomList::new(vec![var("x"), sym("end")]);
        let bindings = bind(&[("x", var("y")), ("y", sym("K"))]);
        let (settled, rounds) =
            rewrite_to_fixpoint(&list, &bindings, &RewriteConfig::default()).unwrap();
        assert_eq!(rounds, 2);
        assert_eq!(settled.render(), "K, end");
    }

    #[test]
    fn test_fixpoint_of_unchanged_list_is_identity() {
        let list = AtomList::new(vec![sym("a")]);
        let (settled, rounds) =
            rewrite_to_fixpoint(&list, &Bindings::new(), &RewriteConfig::default()).unwrap();
        assert_eq!(rounds, 0);
        assert!(AtomList::ptr_eq(&list, &settled));
    }

    #[test]
    fn test_fixpoint_divergence() {
        // $x -> [$x] grows forever.
        let list = AtomList::new(vec![var("x")]);
        let bindings = bind(&[("x", AtomList::new(vec![var("x")]).into_atom())]);
        let config = RewriteConfig { max_rounds: 5 };
        let err = rewrite_to_fixpoint(&list, &bindings, &config).unwrap_err();
        assert_eq!(err, AtomError::RewriteDiverged { rounds: 5 });
    }

    fn arb_element() -> impl Strategy<Value = AtomRef> {
        prop_oneof![
            "[a-c]".prop_map(|name| Symbol::atom(name)),
            "[u-z]".prop_map(|name| Variable::atom(name)),
        ]
    }

    proptest! {
        #[test]
        fn prop_rewrite_is_elementwise(
            atoms in proptest::collection::vec(arb_element(), 0..10),
            bound in proptest::collection::btree_map("[u-z]", "[k-m]", 0..4),
        ) {
            let bindings: Bindings = bound
                .iter()
                .map(|(name, value)| (VariableName::new(name.as_str()), sym(value)))
                .collect();
            let list = AtomList::new(atoms.clone());
            let (rewritten, changed) = list.rewrite(&bindings).unwrap();

            let mut any_changed = false;
            let expected: Vec<AtomRef> = atoms
                .iter()
                .map(|atom| match atom.rewrite(&bindings).unwrap() {
                    Some(new_atom) => {
                        any_changed = true;
                        new_atom
                    }
                    None => atom.clone(),
                })
                .collect();

            prop_assert_eq!(changed, any_changed);
            prop_assert_eq!(rewritten, AtomList::new(expected));
        }
    }
}
