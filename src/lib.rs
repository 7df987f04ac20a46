//! # ARCHGRAPH
//!
//! Structural graphs of a Python codebase, computed without running it.
//!
//! Each run rescans the tree from scratch and renders one Mermaid view:
//!
//! - **file**: which module imports which (`graph TD`)
//! - **class**: classes, their method signatures and inheritance (`classDiagram`)
//! - **call**: which function or method calls which (`graph TD`), either the
//!   whole project or the closure reachable from one entry symbol
//!
//! Output lands in `docs/architecture/graphs/` under the scanned root.

pub mod builders;
pub mod core;
pub mod formatters;
pub mod parsers;

pub use crate::core::{init_architecture, visualize, GraphMode, VisualizeReport};
