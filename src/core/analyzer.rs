use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{GraphError, Result};
use super::graph::{CodeGraph, GraphMode};
use super::module_index::ModuleIndex;
use super::scanner::FileScanner;
use crate::builders::{
    CallGraphBuilder, CallRegistry, ClassGraphBuilder, FileGraphBuilder, ParsedProject,
};
use crate::formatters::{output_path, MermaidFormatter, FILE_GRAPH_NAME, GRAPHS_DIR};
use crate::parsers::{python::PythonParser, SkippedUnit};

const ARCHITECTURE_DIR: &str = "docs/architecture";
const GOVERNANCE_DIR: &str = "docs/architecture/governance";
const SYSTEM_DESIGN_NAME: &str = "system_design.mmd";

/// What one mode produced before anything is written.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Graph {
        graph: CodeGraph,
        /// Entry symbol that matched no callable (call mode only).
        missing_entry: Option<String>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub outcome: AnalysisOutcome,
    pub units_scanned: usize,
    pub skipped: Vec<SkippedUnit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Written,
    Failed,
}

/// Result of one `visualize` call. Its `Display` is the short status line.
#[derive(Debug, Clone, Serialize)]
pub struct VisualizeReport {
    pub mode: GraphMode,
    pub status: ReportStatus,
    pub message: String,
    pub output_path: Option<PathBuf>,
    pub nodes: usize,
    pub edges: usize,
    pub units_scanned: usize,
    pub skipped: Vec<SkippedUnit>,
    pub missing_entry: Option<String>,
}

impl VisualizeReport {
    pub fn is_written(&self) -> bool {
        self.status == ReportStatus::Written
    }
}

impl fmt::Display for VisualizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Scan -> parse -> build -> render, fresh for every call.
pub struct CodebaseAnalyzer {
    file_scanner: FileScanner,
    parser: PythonParser,
    file_builder: FileGraphBuilder,
    class_builder: ClassGraphBuilder,
    call_builder: CallGraphBuilder,
    formatter: MermaidFormatter,
}

impl CodebaseAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            file_scanner: FileScanner::new(),
            parser: PythonParser::new()?,
            file_builder: FileGraphBuilder::new(),
            class_builder: ClassGraphBuilder::new(),
            call_builder: CallGraphBuilder::new(),
            formatter: MermaidFormatter::new(),
        })
    }

    /// Build the graph for `mode` without writing anything.
    pub fn analyze(
        &self,
        root_path: &Path,
        mode: GraphMode,
        focus: Option<&str>,
        entry: Option<&str>,
    ) -> Result<Analysis> {
        let focus = focus.filter(|text| !text.is_empty());
        let entry = entry.filter(|text| !text.is_empty());

        let units = self.file_scanner.scan_directory(root_path)?;
        let project = ParsedProject::parse(units, &self.parser);
        let skipped = project.skipped();
        let units_scanned = project.len();

        log::info!(
            "Parsed {} of {} units ({} skipped)",
            units_scanned - skipped.len(),
            units_scanned,
            skipped.len()
        );

        let outcome = match mode {
            GraphMode::File => {
                let index = ModuleIndex::build(&project.units);
                match self.file_builder.build(&project, &index, focus) {
                    Ok(graph) => AnalysisOutcome::Graph {
                        graph,
                        missing_entry: None,
                    },
                    Err(err @ GraphError::FocusNotFound { .. }) => AnalysisOutcome::Failed {
                        message: format!("❌ {}", err),
                    },
                    Err(err) => return Err(err),
                }
            }
            GraphMode::Class => AnalysisOutcome::Graph {
                graph: self.class_builder.build(&project, focus),
                missing_entry: None,
            },
            GraphMode::Call => {
                let registry = CallRegistry::collect(&project);
                match entry {
                    Some(entry) => {
                        let trace = self.call_builder.build_from_entry(&registry, entry);
                        AnalysisOutcome::Graph {
                            graph: trace.graph,
                            missing_entry: trace.start.is_none().then(|| entry.to_string()),
                        }
                    }
                    None => AnalysisOutcome::Graph {
                        graph: self.call_builder.build_full(&registry, focus),
                        missing_entry: None,
                    },
                }
            }
        };

        Ok(Analysis {
            outcome,
            units_scanned,
            skipped,
        })
    }

    /// Build the graph for `mode` and write it under `docs/architecture/graphs`.
    ///
    /// Builder failures (a file-mode focus matching nothing) come back as a
    /// report with `ReportStatus::Failed` and nothing written; only I/O
    /// problems are errors.
    pub fn visualize(
        &self,
        root_path: &Path,
        focus: Option<&str>,
        mode: GraphMode,
        entry: Option<&str>,
    ) -> Result<VisualizeReport> {
        let root = fs::canonicalize(root_path).map_err(|err| GraphError::io(root_path, err))?;
        let focused = focus.map_or(false, |text| !text.is_empty());

        let Analysis {
            outcome,
            units_scanned,
            skipped,
        } = self.analyze(&root, mode, focus, entry)?;

        let report = match outcome {
            AnalysisOutcome::Failed { message } => VisualizeReport {
                mode,
                status: ReportStatus::Failed,
                message,
                output_path: None,
                nodes: 0,
                edges: 0,
                units_scanned,
                skipped,
                missing_entry: None,
            },
            AnalysisOutcome::Graph {
                graph,
                missing_entry,
            } => {
                let dest = output_path(&root, mode, focused);
                self.formatter.format_to_file(&graph, &dest)?;
                log::info!(
                    "Wrote {} graph ({} nodes, {} edges) to {}",
                    mode,
                    graph.node_count(),
                    graph.edge_count(),
                    dest.display()
                );

                VisualizeReport {
                    mode,
                    status: ReportStatus::Written,
                    message: format!("✅ Graph: {}", dest.display()),
                    nodes: graph.node_count(),
                    edges: graph.edge_count(),
                    output_path: Some(dest),
                    units_scanned,
                    skipped,
                    missing_entry,
                }
            }
        };

        Ok(report)
    }
}

/// Single-call entry point: scan `root`, build the `mode` graph and write it.
pub fn visualize(
    root: &Path,
    focus: Option<&str>,
    mode: GraphMode,
    entry: Option<&str>,
) -> Result<VisualizeReport> {
    CodebaseAnalyzer::new()?.visualize(root, focus, mode, entry)
}

/// Create the architecture docs skeleton, keeping any graph that already exists.
pub fn init_architecture(root: &Path) -> Result<String> {
    let graphs = root.join(GRAPHS_DIR);
    for dir in [graphs.clone(), root.join(GOVERNANCE_DIR)] {
        fs::create_dir_all(&dir).map_err(|err| GraphError::io(&dir, err))?;
    }

    let placeholders = [
        (SYSTEM_DESIGN_NAME, "graph TD\n    User --> System"),
        (FILE_GRAPH_NAME, "classDiagram\n    %% Empty"),
    ];
    for (name, content) in placeholders {
        let path = graphs.join(name);
        if !path.exists() {
            fs::write(&path, content).map_err(|err| GraphError::io(&path, err))?;
        }
    }

    log::info!("Initialized {}", root.join(ARCHITECTURE_DIR).display());
    Ok("✅ Init: Structure Complete".to_string())
}
