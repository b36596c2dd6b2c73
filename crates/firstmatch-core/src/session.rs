//! Per-match state shared by every clause submitted against one subject.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::Cell;

#[derive(Debug)]
struct SessionState {
    continue_evaluating: Cell<bool>,
    ended: Cell<bool>,
}

/// Owns a subject and the evaluation state of the clauses tried against it.
///
/// Each clause submission holds the session lock from its type check until its
/// action step finishes. The lock is reentrant, so a guard or action may call
/// back into the same session on the same thread.
///
/// ```
/// use firstmatch_core::begin_match;
///
/// let session = begin_match(42_i64);
/// let fired = session.try_type::<String>().then(|_| "string");
/// assert_eq!(fired, None);
///
/// let fired = session.try_type::<i64>().guard(|n| *n > 0).then(|n| n * 2);
/// assert_eq!(fired, Some(84));
/// assert!(session.is_ended());
/// ```
#[derive(Debug)]
pub struct MatchSession<S> {
    subject: S,
    state: ReentrantMutex<SessionState>,
}

pub fn begin_match<S>(subject: S) -> MatchSession<S> {
    MatchSession::new(subject)
}

impl<S> MatchSession<S> {
    pub fn new(subject: S) -> Self {
        Self {
            subject,
            state: ReentrantMutex::new(SessionState {
                continue_evaluating: Cell::new(true),
                ended: Cell::new(false),
            }),
        }
    }

    pub fn subject(&self) -> &S {
        &self.subject
    }

    /// Locks the session for one clause unit. Dropping the guard releases it.
    pub fn acquire(&self) -> SessionGuard<'_> {
        SessionGuard {
            inner: self.state.lock(),
        }
    }

    /// Marks the session ended. Calling it again has no further effect.
    pub fn terminate(&self) {
        self.acquire().terminate();
    }

    pub fn is_ended(&self) -> bool {
        self.acquire().is_ended()
    }

    pub fn continue_evaluating(&self) -> bool {
        self.acquire().continue_evaluating()
    }

    /// True while some thread holds the session lock.
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }
}

/// Scoped hold on a session's lock.
pub struct SessionGuard<'a> {
    inner: ReentrantMutexGuard<'a, SessionState>,
}

impl SessionGuard<'_> {
    pub fn is_ended(&self) -> bool {
        self.inner.ended.get()
    }

    pub fn continue_evaluating(&self) -> bool {
        self.inner.continue_evaluating.get()
    }

    pub(crate) fn set_continue_evaluating(&self, value: bool) {
        self.inner.continue_evaluating.set(value);
    }

    pub fn terminate(&self) {
        if !self.inner.ended.replace(true) {
            tracing::trace!("session ended");
        }
    }
}
