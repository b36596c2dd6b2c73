use crate::error::{Error, Result};
use crate::record::{Entry, Record, Relative, Staff};
use firstmatch_core::{Clauses, Components, Outcome};
use rayon::prelude::*;
use serde::Serialize;
use std::any::Any;

pub const CLAUSE_LABELS: [&str; 3] = ["relative if age > 18", "staff if id > 0", "staff"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordResult {
    pub line: usize,
    pub kind: &'static str,
    /// 1-based number of the clause that fired.
    pub clause: Option<usize>,
    pub message: Option<String>,
    pub attempted: usize,
}

impl RecordResult {
    pub fn matched(&self) -> bool {
        self.clause.is_some()
    }

    pub fn label(&self) -> Option<&'static str> {
        self.clause.map(|n| CLAUSE_LABELS[n - 1])
    }
}

/// The demonstration clause set, in submission order.
pub fn demo_clauses<'a, S: Any>() -> Clauses<'a, S, String> {
    Clauses::new()
        .case_if::<Relative>(
            |r| r.age > 18,
            |r| {
                let (name, _, age) = r.components();
                format!("I'm {}, my age is {}", name, age)
            },
        )
        .case_if::<Staff>(
            |s| s.id > 0,
            |s| {
                let (name, id) = s.components();
                format!("fellow {}, id is {}", name, id)
            },
        )
        .case::<Staff>(|s| {
            let (name, id) = s.components();
            format!("{}, id is {}", name, id)
        })
}

pub fn evaluate_record(entry: &Entry) -> Result<RecordResult> {
    let outcome = match &entry.record {
        Record::Staff(staff) => demo_clauses().evaluate(staff.clone()),
        Record::Relative(relative) => demo_clauses().evaluate(relative.clone()),
    }
    .map_err(|e| Error::Clause {
        line: entry.line,
        source: e,
    })?;

    tracing::debug!(
        line = entry.line,
        kind = entry.record.kind(),
        fired = ?outcome.fired,
        "record evaluated"
    );

    Ok(to_result(entry, outcome))
}

fn to_result(entry: &Entry, outcome: Outcome<String>) -> RecordResult {
    RecordResult {
        line: entry.line,
        kind: entry.record.kind(),
        clause: outcome.fired.map(|i| i + 1),
        attempted: outcome.attempted,
        message: outcome.value,
    }
}

/// Each record gets its own session, so records evaluate independently.
pub fn evaluate_all(entries: &[Entry], sequential: bool) -> Result<Vec<RecordResult>> {
    if sequential || entries.len() <= 1 {
        entries.iter().map(evaluate_record).collect()
    } else {
        entries.par_iter().map(evaluate_record).collect()
    }
}
