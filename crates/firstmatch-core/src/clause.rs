//! The three steps of a clause: type check, guard, action.
//!
//! A [`Candidate`] is the pending clause between its type check and its action.
//! It owns the session lock, so the whole clause is one atomic unit and the
//! lock is released however the clause exits.

use crate::components::Components;
use crate::error::{BoxError, ClauseError};
use crate::session::{MatchSession, SessionGuard};
use std::any::{type_name, Any};

enum Slot<'s, V> {
    Matched(&'s V),
    Placeholder(V),
    Empty,
}

/// A clause whose type check has run and whose action has not.
#[must_use = "a pending clause holds the session lock until its action step runs or it is dropped"]
pub struct Candidate<'s, V> {
    lock: SessionGuard<'s>,
    slot: Slot<'s, V>,
    // Owned by this clause so nested submissions from a guard cannot flip it.
    selected: bool,
}

impl<S: Any> MatchSession<S> {
    /// Type check step with a placeholder of the expected type.
    ///
    /// The placeholder stands in for the subject whenever the clause does not
    /// match, and is returned untouched once the session has ended.
    pub fn try_clause<V: Any>(&self, placeholder: V) -> Candidate<'_, V> {
        self.type_check(Some(placeholder))
    }

    /// Type check step keyed on `V` alone.
    pub fn try_type<V: Any>(&self) -> Candidate<'_, V> {
        self.type_check(None)
    }

    /// Fused clause: type check, no guard, then the action.
    pub fn try_clause_with_action<V, R, F>(&self, placeholder: V, action: F) -> Option<R>
    where
        V: Any,
        F: FnOnce(&V) -> R,
    {
        self.try_clause(placeholder).then(action)
    }

    /// Fused clause without a placeholder.
    pub fn case<V, R, F>(&self, action: F) -> Option<R>
    where
        V: Any,
        F: FnOnce(&V) -> R,
    {
        self.try_type::<V>().then(action)
    }

    fn type_check<V: Any>(&self, placeholder: Option<V>) -> Candidate<'_, V> {
        let lock = self.acquire();
        let fallback = || match placeholder {
            Some(value) => Slot::Placeholder(value),
            None => Slot::Empty,
        };

        if lock.is_ended() {
            tracing::trace!(expected = type_name::<V>(), "session ended, clause skipped");
            return Candidate {
                lock,
                slot: fallback(),
                selected: false,
            };
        }

        // Nominal check: downcasting succeeds exactly when the TypeIds are equal.
        let subject: &dyn Any = self.subject();
        let slot = match subject.downcast_ref::<V>() {
            Some(matched) => Slot::Matched(matched),
            None => fallback(),
        };

        let matched = matches!(slot, Slot::Matched(_));
        lock.set_continue_evaluating(matched);
        tracing::trace!(
            subject = type_name::<S>(),
            expected = type_name::<V>(),
            matched,
            "type check"
        );

        Candidate {
            lock,
            slot,
            selected: matched,
        }
    }
}

impl<'s, V> Candidate<'s, V> {
    pub fn is_matched(&self) -> bool {
        matches!(self.slot, Slot::Matched(_))
    }

    /// The subject viewed as `V` when the type matched, else the placeholder.
    pub fn value(&self) -> Option<&V> {
        match &self.slot {
            Slot::Matched(value) => Some(*value),
            Slot::Placeholder(value) => Some(value),
            Slot::Empty => None,
        }
    }

    /// Consumes the pending clause, releasing the lock, and hands back the
    /// placeholder if one was carried.
    pub fn into_placeholder(self) -> Option<V> {
        match self.slot {
            Slot::Placeholder(value) => Some(value),
            _ => None,
        }
    }

    fn selected(&self) -> Option<&'s V> {
        if !self.selected || self.lock.is_ended() {
            return None;
        }
        match self.slot {
            Slot::Matched(value) => Some(value),
            _ => None,
        }
    }

    fn reject(&mut self) {
        self.selected = false;
        self.lock.set_continue_evaluating(false);
    }

    // Ends the session before the action runs, so nothing the action submits
    // to this session can fire.
    fn fire(&self) {
        tracing::debug!(expected = type_name::<V>(), "clause fired");
        self.lock.set_continue_evaluating(true);
        self.lock.terminate();
    }

    /// Guard step. The predicate only runs for a live, type-matched clause,
    /// and returning `false` vetoes the match.
    pub fn guard<P>(mut self, predicate: P) -> Self
    where
        P: FnOnce(&V) -> bool,
    {
        if let Some(value) = self.selected() {
            if predicate(value) {
                self.lock.set_continue_evaluating(self.selected);
            } else {
                tracing::trace!(expected = type_name::<V>(), "guard rejected");
                self.reject();
            }
        }
        self
    }

    /// Guard step with a fallible predicate. An error leaves the clause
    /// unfired, releases the lock and is returned to the caller.
    pub fn try_guard<P, E>(mut self, predicate: P) -> Result<Self, ClauseError>
    where
        P: FnOnce(&V) -> Result<bool, E>,
        E: Into<BoxError>,
    {
        if let Some(value) = self.selected() {
            match predicate(value) {
                Ok(true) => self.lock.set_continue_evaluating(self.selected),
                Ok(false) => {
                    tracing::trace!(expected = type_name::<V>(), "guard rejected");
                    self.reject();
                }
                Err(e) => {
                    self.reject();
                    return Err(ClauseError::Guard {
                        expected: type_name::<V>(),
                        source: e.into(),
                    });
                }
            }
        }
        Ok(self)
    }

    /// Action step. When the clause is selected, ends the session, runs the
    /// action and returns its result.
    pub fn then<R, F>(self, action: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        let value = self.selected()?;
        self.fire();
        Some(action(value))
    }

    /// Action step with a fallible action. A selected clause ends the session
    /// even when its action fails.
    pub fn try_then<R, E, F>(self, action: F) -> Result<Option<R>, ClauseError>
    where
        F: FnOnce(&V) -> Result<R, E>,
        E: Into<BoxError>,
    {
        let Some(value) = self.selected() else {
            return Ok(None);
        };
        self.fire();
        action(value)
            .map(Some)
            .map_err(|e| ClauseError::Action {
                expected: type_name::<V>(),
                source: e.into(),
            })
    }

    /// Action step receiving the matched value's positional components.
    pub fn then_components<R, F>(self, action: F) -> Option<R>
    where
        V: Components,
        F: FnOnce(V::Parts) -> R,
    {
        self.then(|value| action(value.components()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::begin_match;
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[derive(Debug, Default, PartialEq)]
    struct Relative {
        name: String,
        relationship: String,
        age: u32,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Staff {
        name: String,
        id: i32,
    }

    impl Components for Staff {
        type Parts = (String, i32);

        fn components(&self) -> (String, i32) {
            (self.name.clone(), self.id)
        }
    }

    fn jack() -> Staff {
        Staff {
            name: "jack".to_string(),
            id: 1,
        }
    }

    #[test]
    fn test_scenario_second_clause_fires() {
        let session = begin_match(jack());
        let mut trace = Vec::new();

        session
            .try_clause(Relative::default())
            .guard(|r| r.age > 18)
            .then(|r| trace.push(format!("P {}", r.name)));
        session
            .try_clause(Staff::default())
            .guard(|s| s.id > 0)
            .then_components(|(name, id)| trace.push(format!("Q {} {}", name, id)));
        session.try_clause_with_action(Staff::default(), |s| trace.push(format!("R {}", s.name)));

        assert_eq!(trace, vec!["Q jack 1"]);
        assert!(session.is_ended());
    }

    #[test]
    fn test_first_match_wins() {
        let session = begin_match(7u32);
        let first = session.case::<u32, _, _>(|n| n + 1);
        let second = session.case::<u32, _, _>(|n| n + 2);
        assert_eq!(first, Some(8));
        assert_eq!(second, None);
    }

    #[test]
    fn test_type_mismatch_skips_guard() {
        let session = begin_match(jack());
        let calls = Cell::new(0);
        let fired = session
            .try_clause(Relative::default())
            .guard(|_| {
                calls.set(calls.get() + 1);
                true
            })
            .then(|_| ());
        assert_eq!(fired, None);
        assert_eq!(calls.get(), 0);
        assert!(!session.is_ended());
        assert!(!session.continue_evaluating());
    }

    #[test]
    fn test_guard_downgrades_without_ending() {
        let session = begin_match(jack());
        let rejected = session.try_type::<Staff>().guard(|s| s.id > 5).then(|_| "Q");
        let accepted = session.try_type::<Staff>().then(|_| "R");
        assert_eq!(rejected, None);
        assert_eq!(accepted, Some("R"));
    }

    #[test]
    fn test_ended_session_is_inert() {
        let session = begin_match(jack());
        session.terminate();
        let calls = Cell::new(0);
        let candidate = session.try_clause(Staff {
            name: "placeholder".to_string(),
            id: 0,
        });
        assert!(!candidate.is_matched());
        assert_eq!(candidate.value().map(|s| s.name.as_str()), Some("placeholder"));
        let fired = candidate
            .guard(|_| {
                calls.set(calls.get() + 1);
                true
            })
            .then(|_| calls.set(calls.get() + 1));
        assert_eq!(fired, None);
        assert_eq!(calls.get(), 0);
        assert!(session.continue_evaluating());
    }

    #[test]
    fn test_no_match_leaves_session_open() {
        let session = begin_match(jack());
        session.try_type::<Staff>().guard(|_| false).then(|_| ());
        session.try_type::<Relative>().then(|_| ());
        assert!(!session.is_ended());
        assert!(!session.continue_evaluating());
        assert!(!session.is_locked());
    }

    #[test]
    fn test_matched_value_is_subject() {
        let session = begin_match(jack());
        let candidate = session.try_clause(Staff::default());
        assert!(candidate.is_matched());
        assert_eq!(candidate.value(), Some(&jack()));
    }

    #[test]
    fn test_dropped_candidate_releases_lock() {
        let session = begin_match(jack());
        let candidate = session.try_type::<Staff>();
        assert!(session.is_locked());
        drop(candidate);
        assert!(!session.is_locked());
        assert!(!session.is_ended());
    }

    #[test]
    fn test_into_placeholder() {
        let session = begin_match(jack());
        let placeholder = session.try_clause(Relative {
            relationship: "aunt".to_string(),
            ..Relative::default()
        });
        assert_eq!(
            placeholder.into_placeholder().map(|r| r.relationship),
            Some("aunt".to_string())
        );
        assert!(!session.is_locked());
    }

    #[test]
    fn test_guard_error_propagates_and_releases() {
        let session = begin_match(jack());
        let result = session
            .try_type::<Staff>()
            .try_guard(|_| Err::<bool, _>("lookup failed"));
        assert!(matches!(result, Err(ClauseError::Guard { .. })));
        assert!(!session.is_locked());
        assert!(!session.is_ended());
        assert_eq!(session.try_type::<Staff>().then(|s| s.id), Some(1));
    }

    #[test]
    fn test_action_error_still_ends_session() {
        let session = begin_match(jack());
        let result = session
            .try_type::<Staff>()
            .try_then(|_| Err::<(), _>("write failed"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Staff"));
        assert!(session.is_ended());
        assert_eq!(session.try_type::<Staff>().then(|_| ()), None);
    }

    #[test]
    fn test_panicking_guard_releases_lock() {
        let session = begin_match(jack());
        let result = catch_unwind(AssertUnwindSafe(|| {
            session.try_type::<Staff>().guard(|_| panic!("guard blew up")).then(|_| ())
        }));
        assert!(result.is_err());
        assert!(!session.is_locked());
        assert!(!session.is_ended());
    }

    #[test]
    fn test_action_can_reenter_session() {
        let session = begin_match(jack());
        let ended_inside = session.try_type::<Staff>().then(|_| session.is_ended());
        assert_eq!(ended_inside, Some(true));
        assert!(session.is_ended());
    }

    #[test]
    fn test_nested_clause_in_action_does_not_fire() {
        let session = begin_match(5u32);
        let actions = Cell::new(0);
        session.case::<u32, _, _>(|_| {
            actions.set(actions.get() + 1);
            session.case::<u32, _, _>(|_| actions.set(actions.get() + 1));
        });
        assert_eq!(actions.get(), 1);
        assert!(session.is_ended());
    }

    #[test]
    fn test_nested_mismatch_in_guard_keeps_clause_selected() {
        let session = begin_match(5u32);
        let fired = session
            .try_type::<u32>()
            .guard(|_| {
                assert!(!session.try_type::<String>().is_matched());
                true
            })
            .then(|n| *n);
        assert_eq!(fired, Some(5));
        assert!(session.is_ended());
        assert!(session.continue_evaluating());
    }

    #[test]
    fn test_nested_match_in_guard_wins() {
        let session = begin_match(5u32);
        let inner = Cell::new(None);
        let outer = session
            .try_type::<u32>()
            .guard(|_| {
                inner.set(session.case::<u32, _, _>(|n| n + 1));
                true
            })
            .then(|n| *n);
        assert_eq!(inner.get(), Some(6));
        assert_eq!(outer, None);
    }

    #[test]
    fn test_panicking_action_still_ends_session() {
        let session = begin_match(jack());
        let result = catch_unwind(AssertUnwindSafe(|| {
            session.try_type::<Staff>().then(|_| panic!("action blew up"))
        }));
        assert!(result.is_err());
        assert!(session.is_ended());
        assert!(!session.is_locked());
    }

    #[test]
    fn test_concurrent_submissions_fire_once() {
        let session = begin_match(jack());
        let fired = std::sync::atomic::AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    session.try_type::<Staff>().then(|_| {
                        fired.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    });
                });
            }
        });
        assert_eq!(fired.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(session.is_ended());
    }
}
