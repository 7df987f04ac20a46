pub mod common;
pub mod python;

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A class definition as written in one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFacts {
    pub name: String,
    /// Declared bases, rightmost component only (`abc.ABC` -> `ABC`).
    pub bases: Vec<String>,
    /// `+name(a, b)` / `-_name(a)` in declaration order.
    pub methods: Vec<String>,
    pub line_number: usize,
}

/// A top-level function or a method of a top-level class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableFacts {
    /// `Class.method` or bare function name.
    pub qualified_name: String,
    pub class_name: Option<String>,
    /// Candidate callees in source order, `self.x()` already rewritten to `Class.x`.
    pub callees: Vec<String>,
    pub line_number: usize,
}

/// Everything extracted from one source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFacts {
    pub imports: Vec<String>,
    pub classes: Vec<ClassFacts>,
    pub callables: Vec<CallableFacts>,
}

/// Why a unit contributed no facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    Unreadable { message: String },
    SyntaxError { line: usize },
    NoTree,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable { message } => write!(f, "unreadable: {}", message),
            SkipReason::SyntaxError { line } => write!(f, "syntax error near line {}", line),
            SkipReason::NoTree => f.write_str("parser produced no tree"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedUnit {
    pub path: PathBuf,
    pub reason: SkipReason,
}

pub type ParseOutcome = std::result::Result<UnitFacts, SkipReason>;

pub trait LanguageParser {
    fn parse_source(&self, source: &str) -> ParseOutcome;

    fn parse_file(&self, file_path: &Path) -> ParseOutcome {
        let source = common::read_source(file_path).map_err(|err| SkipReason::Unreadable {
            message: err.to_string(),
        })?;
        self.parse_source(&source)
    }

    fn language_name(&self) -> &str;
}
