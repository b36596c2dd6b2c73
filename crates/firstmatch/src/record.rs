//! Records read from JSON-lines input.

use crate::error::{Error, Result};
use firstmatch_core::Components;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relative {
    pub name: String,
    pub relationship: String,
    pub age: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Staff {
    pub name: String,
    pub id: i32,
}

impl Default for Staff {
    fn default() -> Self {
        Self {
            name: "Good colleague".to_string(),
            id: 0,
        }
    }
}

impl Components for Relative {
    type Parts = (String, String, i32);

    fn components(&self) -> Self::Parts {
        (self.name.clone(), self.relationship.clone(), self.age)
    }
}

impl Components for Staff {
    type Parts = (String, i32);

    fn components(&self) -> Self::Parts {
        (self.name.clone(), self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Staff(Staff),
    Relative(Relative),
}

impl Record {
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Staff(_) => "staff",
            Record::Relative(_) => "relative",
        }
    }
}

/// A record together with the 1-based input line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub line: usize,
    pub record: Record,
}

pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    std::fs::read_to_string(path).map_err(|e| Error::ReadInput {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn parse_records(content: &str) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let record =
            serde_json::from_str(raw).map_err(|e| Error::ParseRecord { line, source: e })?;
        entries.push(Entry { line, record });
    }

    Ok(entries)
}

pub fn parse_file(path: &Path) -> Result<Vec<Entry>> {
    let content = read_input(path)?;
    parse_records(&content)
}
