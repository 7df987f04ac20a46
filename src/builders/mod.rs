//! Graph builders: one per mode, each a pure function of the parsed project.

pub mod call_graph;
pub mod class_graph;
pub mod file_graph;

pub use call_graph::{CallGraphBuilder, CallRegistry, EntryTrace};
pub use class_graph::ClassGraphBuilder;
pub use file_graph::FileGraphBuilder;

use crate::core::scanner::SourceUnit;
use crate::parsers::{LanguageParser, ParseOutcome, SkippedUnit, UnitFacts};

/// Collected units paired with their per-unit extraction outcome.
#[derive(Debug, Clone)]
pub struct ParsedProject {
    pub units: Vec<SourceUnit>,
    outcomes: Vec<ParseOutcome>,
}

impl ParsedProject {
    pub fn parse(units: Vec<SourceUnit>, parser: &dyn LanguageParser) -> Self {
        let outcomes = units
            .iter()
            .map(|unit| {
                let outcome = parser.parse_file(&unit.path);
                if let Err(reason) = &outcome {
                    log::warn!("Skipping {}: {}", unit.relative_path.display(), reason);
                }
                outcome
            })
            .collect();
        Self { units, outcomes }
    }

    /// Pair units with already-computed outcomes (same order, same length).
    pub fn from_outcomes(units: Vec<SourceUnit>, outcomes: Vec<ParseOutcome>) -> Self {
        debug_assert_eq!(units.len(), outcomes.len());
        Self { units, outcomes }
    }

    /// Units that parsed, with their position in the scan.
    pub fn parsed(&self) -> impl Iterator<Item = (usize, &SourceUnit, &UnitFacts)> {
        self.units
            .iter()
            .zip(&self.outcomes)
            .enumerate()
            .filter_map(|(position, (unit, outcome))| {
                outcome.as_ref().ok().map(|facts| (position, unit, facts))
            })
    }

    pub fn skipped(&self) -> Vec<SkippedUnit> {
        self.units
            .iter()
            .zip(&self.outcomes)
            .filter_map(|(unit, outcome)| {
                outcome.as_ref().err().map(|reason| SkippedUnit {
                    path: unit.relative_path.clone(),
                    reason: reason.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
