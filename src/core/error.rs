use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Parser initialization failed: {0}")]
    ParserInit(String),

    #[error("Focus target '{focus}' not found. (Scanned {scanned} files)")]
    FocusNotFound { focus: String, scanned: usize },

    #[error("Unknown graph mode '{0}' (expected file, class or call)")]
    UnknownMode(String),
}

impl GraphError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraphError::Io {
            path: path.into(),
            source,
        }
    }
}
