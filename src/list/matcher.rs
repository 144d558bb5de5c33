//! Backtracking sequence matching for atom lists.
//!
//! Matching `[p0, .., pn]` against `[s0, .., sn]` is a depth-first search over
//! position-local choice points. Each position `i` owns the candidate stream
//! of `pi` against `si` under the bindings chosen for positions `0..i`. A
//! successful candidate opens the stream for `i + 1`; an exhausted stream is
//! popped, which resumes the stream at `i - 1` (backtracking). Nothing past
//! position `i` is explored until a candidate at `i` has been chosen.
//!
//! The search is an iterator, so callers decide how many complete matches to
//! pull: the first one ([`AtomList::match_against`]) or all of them.
//!
//! # Citations
//! - Backtracking search: Golomb & Baumert, "Backtrack programming" (1965)
//! - List of successes: Wadler, "How to replace failure by a list of successes" (1985)

use super::budget::StepBudget;
use super::core::AtomList;
use crate::atom::{Atom, AtomError, AtomRef, Candidates};
use crate::bindings::Bindings;
use crate::config::MatchConfig;
use crate::outcome::{Failure, FailureReason, MatchOutcome};
use std::sync::Arc;

/// Search state.
enum State {
    /// Not started; holds the initial bindings.
    Start(Bindings),
    /// At least one position has an open candidate stream.
    Searching,
    /// No further items will be produced.
    Done,
}

/// Open candidate stream at one position.
struct Frame {
    candidates: Candidates,
    /// Whether the stream has yielded any outcome yet.
    produced: bool,
}

/// Lazy enumeration of every complete match of one atom list against a subject.
///
/// Items are produced in deterministic search order:
/// - zero or more `Ok(MatchOutcome::Matched(bindings))`, one per complete match;
/// - if no match was found, exactly one trailing `Ok(MatchOutcome::Failed(_))`
///   holding the most specific failure seen (the deepest position wins, and
///   a position whose stream yielded nothing at all counts as a failure there);
/// - if the step budget runs out, a trailing `Failed` with
///   [`FailureReason::BudgetExhausted`];
/// - if an element raises an error, a single `Err` after which the iterator is done.
///
/// The step budget is shared with every list search nested inside this one.
pub struct SequenceMatches {
    pattern: Arc<AtomList>,
    subject: AtomRef,
    /// The subject as a list, once the kind check has passed.
    subject_list: Option<AtomList>,
    /// One open candidate stream per position, position 0 at the bottom.
    frames: Vec<Frame>,
    state: State,
    /// Most specific failure so far, keyed by the position it occurred at.
    best_failure: Option<(usize, Failure)>,
    successes: u64,
    /// Outcomes pulled at this level.
    steps: u64,
    budget: StepBudget,
}

impl SequenceMatches {
    /// Starts a search of `pattern` against `subject` under `bindings`.
    pub fn new(
        pattern: Arc<AtomList>,
        subject: AtomRef,
        bindings: Bindings,
        config: &MatchConfig,
    ) -> Self {
        Self::with_budget(pattern, subject, bindings, StepBudget::new(config.max_steps))
    }

    /// Starts a search that charges every pulled outcome to `budget`.
    pub fn with_budget(
        pattern: Arc<AtomList>,
        subject: AtomRef,
        bindings: Bindings,
        budget: StepBudget,
    ) -> Self {
        Self {
            pattern,
            subject,
            subject_list: None,
            frames: Vec::new(),
            state: State::Start(bindings),
            best_failure: None,
            successes: 0,
            steps: 0,
            budget,
        }
    }

    /// Number of candidate outcomes pulled at this level so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of complete matches produced so far.
    pub fn successes(&self) -> u64 {
        self.successes
    }

    fn pattern_atom(&self) -> AtomRef {
        self.pattern.clone()
    }

    fn finish(&mut self, reason: FailureReason) -> MatchOutcome {
        self.state = State::Done;
        self.frames.clear();
        MatchOutcome::Failed(Failure::new(reason, self.pattern_atom(), self.subject.clone()))
    }

    fn out_of_budget(&mut self) -> MatchOutcome {
        let steps = self.budget.used();
        tracing::debug!(steps, "atom list match budget exhausted");
        self.finish(FailureReason::BudgetExhausted { steps })
    }

    fn charge(&mut self) {
        self.steps += 1;
        self.budget.charge();
    }

    /// Runs the kind and length checks and opens position 0.
    fn start(&mut self, bindings: Bindings) -> Option<MatchOutcome> {
        let Some(subject) = self.subject.as_any().downcast_ref::<AtomList>().cloned() else {
            tracing::debug!(subject = %self.subject, "list match against a non-list subject");
            return Some(self.finish(FailureReason::NotAList));
        };
        if subject.len() != self.pattern.len() {
            tracing::debug!(
                expected = self.pattern.len(),
                found = subject.len(),
                "list match between lists of different sizes"
            );
            return Some(self.finish(FailureReason::SizeMismatch {
                expected: self.pattern.len(),
                found: subject.len(),
            }));
        }
        if subject.is_empty() {
            self.state = State::Done;
            self.successes += 1;
            return Some(MatchOutcome::Matched(bindings));
        }
        self.subject_list = Some(subject);
        self.state = State::Searching;
        self.open(0, &bindings);
        None
    }

    /// Opens the candidate stream for `position` under `bindings`.
    fn open(&mut self, position: usize, bindings: &Bindings) {
        let Some(subject) = self.subject_list.as_ref() else {
            return;
        };
        let pattern = self.pattern[position].clone();
        let candidates = pattern.candidates_within(&subject[position], bindings, &self.budget);
        self.frames.push(Frame {
            candidates,
            produced: false,
        });
    }

    /// Failure for a position whose stream yielded nothing.
    fn dead_end(&self, position: usize) -> Failure {
        let (pattern, subject) = match self.subject_list.as_ref() {
            Some(subject) => (self.pattern[position].clone(), subject[position].clone()),
            None => (self.pattern_atom(), self.subject.clone()),
        };
        Failure::new(FailureReason::NoCandidates, pattern, subject)
    }

    /// Keeps `failure` if it occurred deeper than the best one so far.
    fn record(&mut self, position: usize, failure: Failure) {
        let deeper = self
            .best_failure
            .as_ref()
            .map_or(true, |(best, _)| position > *best);
        if deeper {
            self.best_failure = Some((position, failure.at(position)));
        }
    }

    /// Final item once every stream is exhausted.
    fn exhausted(&mut self) -> Option<MatchOutcome> {
        self.state = State::Done;
        if self.successes > 0 {
            return None;
        }
        let failure = match self.best_failure.take() {
            Some((_, failure)) => failure,
            None => Failure::new(
                FailureReason::NoCandidates,
                self.pattern_atom(),
                self.subject.clone(),
            ),
        };
        tracing::debug!(%failure, "atom list match failed");
        Some(MatchOutcome::Failed(failure))
    }
}

impl Iterator for SequenceMatches {
    type Item = Result<MatchOutcome, AtomError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Searching) {
                State::Done => {
                    self.state = State::Done;
                    return None;
                }
                State::Start(bindings) => {
                    if let Some(outcome) = self.start(bindings) {
                        return Some(Ok(outcome));
                    }
                }
                State::Searching => {}
            }

            let Some(position) = self.frames.len().checked_sub(1) else {
                return self.exhausted().map(Ok);
            };

            if self.budget.is_exhausted() {
                return Some(Ok(self.out_of_budget()));
            }

            let frame = &mut self.frames[position];
            let item = frame.candidates.next();
            if matches!(item, Some(Ok(_))) {
                frame.produced = true;
            }

            match item {
                None => {
                    tracing::trace!(position, "candidates exhausted, backtracking");
                    let produced = self.frames.pop().is_some_and(|frame| frame.produced);
                    if !produced {
                        let failure = self.dead_end(position);
                        self.record(position, failure);
                    }
                }
                Some(Err(err)) => {
                    self.state = State::Done;
                    self.frames.clear();
                    return Some(Err(err));
                }
                Some(Ok(MatchOutcome::Failed(failure))) => {
                    if let FailureReason::BudgetExhausted { .. } = failure.reason() {
                        return Some(Ok(self.out_of_budget()));
                    }
                    self.charge();
                    self.record(position, failure);
                }
                Some(Ok(MatchOutcome::Matched(bindings))) => {
                    self.charge();
                    if position + 1 == self.pattern.len() {
                        self.successes += 1;
                        return Some(Ok(MatchOutcome::Matched(bindings)));
                    }
                    tracing::trace!(position, "candidate accepted, descending");
                    self.open(position + 1, &bindings);
                }
            }
        }
    }
}

impl AtomList {
    /// Matches this list, as a pattern, against `subject` under `bindings`.
    ///
    /// Returns the first complete match in search order, or the most
    /// specific failure. Errors raised by elements propagate unchanged.
    pub fn match_against(
        &self,
        subject: &AtomRef,
        bindings: &Bindings,
    ) -> Result<MatchOutcome, AtomError> {
        self.match_against_with(subject, bindings, &MatchConfig::default())
    }

    /// Like [`match_against`](Self::match_against), under an explicit search policy.
    pub fn match_against_with(
        &self,
        subject: &AtomRef,
        bindings: &Bindings,
        config: &MatchConfig,
    ) -> Result<MatchOutcome, AtomError> {
        let mut last = None;
        for item in self.matches(subject, bindings, config) {
            let outcome = item?;
            if outcome.is_match() {
                return Ok(outcome);
            }
            last = Some(outcome);
        }
        Ok(last.unwrap_or_else(|| {
            MatchOutcome::Failed(Failure::new(
                FailureReason::NoCandidates,
                self.clone().into_atom(),
                subject.clone(),
            ))
        }))
    }
}
