//! First-match clause evaluation.
//!
//! A subject is matched against clauses in submission order. Each clause names
//! an expected type, an optional guard and an action; the first clause whose
//! type matches and whose guard holds runs its action, and every clause after
//! it is inert.
//!
//! # Example
//!
//! ```
//! use firstmatch_core::begin_match;
//!
//! #[derive(Default)]
//! struct Relative { name: String, age: u32 }
//! #[derive(Default)]
//! struct Staff { name: String, id: i32 }
//!
//! let session = begin_match(Staff { name: "jack".into(), id: 1 });
//! let mut seen = Vec::new();
//!
//! session.try_clause(Relative::default()).guard(|r| r.age > 18).then(|r| seen.push(r.name.clone()));
//! session.try_clause(Staff::default()).guard(|s| s.id > 0).then(|s| seen.push(format!("{} {}", s.name, s.id)));
//! session.try_clause_with_action(Staff::default(), |s| seen.push(s.name.clone()));
//!
//! assert_eq!(seen, vec!["jack 1"]);
//! assert!(session.is_ended());
//! ```

mod clause;
mod clauses;
mod components;
mod error;
mod session;

pub use clause::Candidate;
pub use clauses::{Clauses, Outcome};
pub use components::Components;
pub use error::{BoxError, ClauseError};
pub use session::{begin_match, MatchSession, SessionGuard};
