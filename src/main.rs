use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use archgraph::core::{init_architecture, CodebaseAnalyzer, GraphMode};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "archgraph",
    version,
    author = "archgraph developers",
    about = "Import, class and call graphs for Python codebases"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Render one graph into docs/architecture/graphs
    Visualize {
        /// Project root to scan
        #[arg(short, long, value_name = "PATH", default_value = ".")]
        root: PathBuf,

        /// Only keep the neighbourhood of paths containing this text
        #[arg(short, long, value_name = "TEXT")]
        focus: Option<String>,

        /// Which graph to build
        #[arg(short, long, value_enum, default_value_t = Mode::File)]
        mode: Mode,

        /// Call mode: trace everything reachable from this function or method
        #[arg(short, long, value_name = "NAME")]
        entry: Option<String>,

        /// Print the full report as JSON instead of the status line
        #[arg(long)]
        json: bool,
    },
    /// Create the docs/architecture skeleton
    InitArch {
        /// Project root
        #[arg(short, long, value_name = "PATH", default_value = ".")]
        root: PathBuf,
    },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum Mode {
    File,
    Class,
    Call,
}

impl From<Mode> for GraphMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::File => GraphMode::File,
            Mode::Class => GraphMode::Class,
            Mode::Call => GraphMode::Call,
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Visualize {
            root,
            focus,
            mode,
            entry,
            json,
        } => {
            let analyzer = CodebaseAnalyzer::new()?;
            let report =
                analyzer.visualize(&root, focus.as_deref(), mode.into(), entry.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }

            if report.is_written() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::InitArch { root } => {
            println!("{}", init_architecture(&root)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
