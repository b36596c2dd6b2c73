//! Ordered clause lists evaluated in a single pass.

use crate::error::{BoxError, ClauseError};
use crate::session::MatchSession;
use std::any::{type_name, Any};
use std::fmt;

type Eval<'a, S, R> = Box<dyn FnOnce(&MatchSession<S>) -> Result<Option<R>, ClauseError> + 'a>;

struct Clause<'a, S, R> {
    expected: &'static str,
    eval: Eval<'a, S, R>,
}

/// Result of evaluating a clause list against one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<R> {
    /// Index of the clause whose action ran.
    pub fired: Option<usize>,
    pub value: Option<R>,
    /// Clauses submitted before the session ended.
    pub attempted: usize,
    pub ended: bool,
    pub continue_evaluating: bool,
}

impl<R> Outcome<R> {
    pub fn matched(&self) -> bool {
        self.fired.is_some()
    }

    pub fn into_value(self) -> Option<R> {
        self.value
    }
}

/// An ordered list of clauses, each producing an `R` when it fires.
///
/// ```
/// use firstmatch_core::Clauses;
///
/// let outcome = Clauses::new()
///     .case_if::<String>(|s| s.is_empty(), |_| "empty string")
///     .case::<i32>(|_| "number")
///     .case::<String>(|_| "string")
///     .evaluate("hello".to_string())
///     .unwrap();
///
/// assert_eq!(outcome.fired, Some(2));
/// assert_eq!(outcome.value, Some("string"));
/// ```
pub struct Clauses<'a, S, R> {
    clauses: Vec<Clause<'a, S, R>>,
}

impl<'a, S: Any, R> Clauses<'a, S, R> {
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Adds a clause that fires whenever the subject is a `V`.
    pub fn case<V: Any>(self, action: impl FnOnce(&V) -> R + 'a) -> Self {
        self.push::<V>(Box::new(move |session: &MatchSession<S>| {
            Ok(session.try_type::<V>().then(action))
        }))
    }

    /// Adds a clause that fires when the subject is a `V` and `guard` holds.
    pub fn case_if<V: Any>(
        self,
        guard: impl FnOnce(&V) -> bool + 'a,
        action: impl FnOnce(&V) -> R + 'a,
    ) -> Self {
        self.push::<V>(Box::new(move |session: &MatchSession<S>| {
            Ok(session.try_type::<V>().guard(guard).then(action))
        }))
    }

    /// Like [`case_if`](Self::case_if) with a fallible guard and action. Their
    /// errors abort evaluation.
    pub fn try_case_if<V, G, A, E, F>(self, guard: G, action: A) -> Self
    where
        V: Any,
        G: FnOnce(&V) -> Result<bool, E> + 'a,
        A: FnOnce(&V) -> Result<R, F> + 'a,
        E: Into<BoxError>,
        F: Into<BoxError>,
    {
        self.push::<V>(Box::new(move |session: &MatchSession<S>| {
            session.try_type::<V>().try_guard(guard)?.try_then(action)
        }))
    }

    fn push<V>(mut self, eval: Eval<'a, S, R>) -> Self {
        self.clauses.push(Clause {
            expected: type_name::<V>(),
            eval,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Opens a session for `subject` and evaluates every clause against it.
    pub fn evaluate(self, subject: S) -> Result<Outcome<R>, ClauseError> {
        let session = MatchSession::new(subject);
        self.evaluate_in(&session)
    }

    /// Submits the clauses in order to an existing session, stopping once it
    /// has ended.
    pub fn evaluate_in(self, session: &MatchSession<S>) -> Result<Outcome<R>, ClauseError> {
        let mut fired = None;
        let mut value = None;
        let mut attempted = 0;

        for (index, clause) in self.clauses.into_iter().enumerate() {
            if session.is_ended() {
                break;
            }
            attempted += 1;
            if let Some(result) = (clause.eval)(session)? {
                tracing::debug!(index, expected = clause.expected, "clause list matched");
                fired = Some(index);
                value = Some(result);
            }
        }

        if fired.is_none() {
            tracing::debug!(attempted, "no clause matched");
        }

        Ok(Outcome {
            fired,
            value,
            attempted,
            ended: session.is_ended(),
            continue_evaluating: session.continue_evaluating(),
        })
    }
}

impl<S: Any, R> Default for Clauses<'_, S, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, R> fmt::Debug for Clauses<'_, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.clauses.iter().map(|c| c.expected))
            .finish()
    }
}
