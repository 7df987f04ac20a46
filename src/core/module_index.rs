use std::collections::BTreeMap;

use super::resolver::SymbolResolver;
use super::scanner::SourceUnit;

/// Logical (dotted) module name -> position of the unit in the scan.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    entries: BTreeMap<String, usize>,
}

impl ModuleIndex {
    /// Register every logical name of every unit. A name claimed by two units
    /// maps to the later one.
    pub fn build(units: &[SourceUnit]) -> Self {
        let mut entries = BTreeMap::new();
        for (position, unit) in units.iter().enumerate() {
            for name in &unit.logical_names {
                entries.insert(name.clone(), position);
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries.get(name).copied()
    }

    /// Resolve an imported module name to a unit position.
    pub fn resolve(&self, imported: &str, resolver: &SymbolResolver) -> Option<usize> {
        let key = resolver.resolve(imported, &self.entries)?;
        self.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
