use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::error::{GraphError, Result};
use super::graph::IdAllocator;

/// Directory names that are never descended into, wherever they appear below the root.
pub const EXCLUDED_DIRS: &[&str] = &[
    "venv",
    "_venv",
    ".venv",
    ".env",
    "env",
    "__pycache__",
    ".git",
    ".claude",
    "tests",
    "docs",
    "node_modules",
    "site-packages",
    "dist",
    "build",
];

/// Conventional top-level source directory whose leading segment may be dropped from imports.
pub const SOURCE_DIR: &str = "src";

const PACKAGE_INDEX: &str = "__init__.py";
const PYTHON_EXTENSION: &str = "py";

/// One analyzable file below the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    /// Dotted names this unit answers to; the first is the full path-derived name.
    pub logical_names: Vec<String>,
    /// Graph-safe identifier, unique within one scan.
    pub node_id: String,
}

impl SourceUnit {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without its suffix.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Relative path with `/` separators regardless of platform.
    pub fn relative_display(&self) -> String {
        path_segments(&self.relative_path).join("/")
    }

    pub fn module_name(&self) -> &str {
        self.logical_names.first().map(String::as_str).unwrap_or("")
    }
}

pub struct FileScanner;

impl FileScanner {
    pub fn new() -> Self {
        Self
    }

    /// Collect every eligible `.py` file below `root_path`, in file-name order.
    pub fn scan_directory(&self, root_path: &Path) -> Result<Vec<SourceUnit>> {
        let mut units = Vec::new();
        let mut ids = IdAllocator::new();

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_excluded(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(GraphError::Walk {
                        path: root_path.to_path_buf(),
                        source: err,
                    });
                }
                Err(err) => {
                    log::warn!("Skipping unreadable entry below {}: {err}", root_path.display());
                    continue;
                }
            };

            if !entry.file_type().is_file() || !Self::is_python(entry.path()) {
                continue;
            }

            let path = entry.path().to_path_buf();
            let relative_path = match path.strip_prefix(root_path) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };

            let node_id = ids.id_for(&path_segments(&relative_path).join("/"));
            let logical_names = logical_names_for(&relative_path);

            units.push(SourceUnit {
                path,
                relative_path,
                logical_names,
                node_id,
            });
        }

        log::info!("Found {} source files under {}", units.len(), root_path.display());
        Ok(units)
    }

    fn is_excluded(entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| EXCLUDED_DIRS.contains(&name))
                .unwrap_or(false)
    }

    fn is_python(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(PYTHON_EXTENSION)
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the dotted names a unit can be imported by.
///
/// `src/pkg/util.py` answers to `src.pkg.util` and `pkg.util`; a package index
/// `src/pkg/__init__.py` additionally answers to `src.pkg` and `pkg`.
pub fn logical_names_for(relative_path: &Path) -> Vec<String> {
    let mut parts = path_segments(relative_path);
    let Some(file_name) = parts.pop() else {
        return Vec::new();
    };
    let is_package_index = file_name == PACKAGE_INDEX;
    let stem = file_name
        .strip_suffix(&format!(".{}", PYTHON_EXTENSION))
        .unwrap_or(&file_name)
        .to_string();

    let mut module_parts = parts.clone();
    module_parts.push(stem);

    let under_source_dir = parts.first().map(String::as_str) == Some(SOURCE_DIR);

    let mut names = vec![module_parts.join(".")];
    if under_source_dir {
        names.push(module_parts[1..].join("."));
    }
    if is_package_index && !parts.is_empty() {
        names.push(parts.join("."));
        if under_source_dir && parts.len() > 1 {
            names.push(parts[1..].join("."));
        }
    }
    names
}

fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
