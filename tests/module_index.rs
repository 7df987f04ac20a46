use archgraph::core::resolver::SymbolResolver;
use archgraph::core::scanner::FileScanner;
use archgraph::core::ModuleIndex;
use std::fs;
use std::path::Path;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

#[test]
fn index_resolves_full_short_and_package_names() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "src/app/__init__.py");
    touch(root, "src/app/core.py");
    touch(root, "tools.py");

    let units = FileScanner::new().scan_directory(root).unwrap();
    let index = ModuleIndex::build(&units);
    let resolver = SymbolResolver::for_imports();

    let position = |name: &str| index.resolve(name, &resolver).map(|i| units[i].relative_display());

    assert_eq!(position("src.app.core").as_deref(), Some("src/app/core.py"));
    assert_eq!(position("app.core").as_deref(), Some("src/app/core.py"));
    assert_eq!(position("app.core.Engine").as_deref(), Some("src/app/core.py"));
    assert_eq!(position("app").as_deref(), Some("src/app/__init__.py"));
    assert_eq!(position("app.missing").as_deref(), Some("src/app/__init__.py"));
    assert_eq!(position("tools").as_deref(), Some("tools.py"));
    assert_eq!(position("requests"), None);

    assert_eq!(index.get("src.app"), index.get("app"));
    assert!(!index.is_empty());
    assert_eq!(index.len(), 7);
}
