pub mod analyzer;
pub mod error;
pub mod graph;
pub mod module_index;
pub mod resolver;
pub mod scanner;

pub use analyzer::{
    init_architecture, visualize, Analysis, AnalysisOutcome, CodebaseAnalyzer, ReportStatus,
    VisualizeReport,
};
pub use error::{GraphError, Result};
pub use graph::{
    CodeGraph, DependencyGraph, Edge, EdgeType, GraphBuilder, GraphMode, IdAllocator, Node,
    NodeType,
};
pub use module_index::ModuleIndex;
pub use resolver::{NameLookup, ResolutionStrategy, SymbolResolver};
pub use scanner::{FileScanner, SourceUnit};
