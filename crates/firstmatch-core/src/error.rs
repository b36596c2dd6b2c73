use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure raised by a fallible guard or action. A type mismatch is never an
/// error; it just skips the clause.
#[derive(Error, Debug)]
pub enum ClauseError {
    #[error("guard for clause '{expected}' failed")]
    Guard {
        expected: &'static str,
        #[source]
        source: BoxError,
    },
    #[error("action for clause '{expected}' failed")]
    Action {
        expected: &'static str,
        #[source]
        source: BoxError,
    },
}

impl ClauseError {
    pub fn expected_type(&self) -> &'static str {
        match self {
            ClauseError::Guard { expected, .. } | ClauseError::Action { expected, .. } => expected,
        }
    }
}
