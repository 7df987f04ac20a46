use std::collections::{BTreeMap, BTreeSet};

/// A set of known symbol names that resolution strategies can search.
pub trait NameLookup {
    /// The stored name equal to `name`, if any.
    fn lookup(&self, name: &str) -> Option<&str>;

    /// All names, in a stable order.
    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_>;
}

impl NameLookup for BTreeSet<String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }

    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter().map(String::as_str))
    }
}

impl<V> NameLookup for BTreeMap<String, V> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get_key_value(name).map(|(key, _)| key.as_str())
    }

    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.keys().map(String::as_str))
    }
}

/// One best-effort way of matching a symbolic reference to a known name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// `candidate` is itself a known name.
    Exact,
    /// A known name ends with `.<candidate>` (`bark` -> `Dog.bark`).
    QualifiedSuffix,
    /// The longest known dotted prefix of `candidate` (`pkg.mod.attr` -> `pkg.mod`).
    ShortenedPrefix,
    /// A known name contains `candidate` anywhere.
    Substring,
}

impl ResolutionStrategy {
    pub fn apply<'a, T>(self, candidate: &str, table: &'a T) -> Option<&'a str>
    where
        T: NameLookup + ?Sized,
    {
        match self {
            ResolutionStrategy::Exact => table.lookup(candidate),
            ResolutionStrategy::QualifiedSuffix => {
                let suffix = format!(".{}", candidate);
                table.names().find(|name| name.ends_with(&suffix))
            }
            ResolutionStrategy::ShortenedPrefix => {
                let parts: Vec<&str> = candidate.split('.').collect();
                (1..=parts.len())
                    .rev()
                    .find_map(|len| table.lookup(&parts[..len].join(".")))
            }
            ResolutionStrategy::Substring => table.names().find(|name| name.contains(candidate)),
        }
    }
}

/// Ordered list of strategies; the first one that matches wins.
///
/// This is string matching, not scope analysis: it can pick the wrong
/// definition when names repeat across classes or modules.
#[derive(Debug, Clone)]
pub struct SymbolResolver {
    strategies: Vec<ResolutionStrategy>,
}

impl SymbolResolver {
    pub fn new(strategies: Vec<ResolutionStrategy>) -> Self {
        Self { strategies }
    }

    /// Import targets: exact module name, then progressively shorter prefixes.
    pub fn for_imports() -> Self {
        Self::new(vec![
            ResolutionStrategy::Exact,
            ResolutionStrategy::ShortenedPrefix,
        ])
    }

    /// Call targets: exact qualified name, then `Class.method` suffix.
    pub fn for_calls() -> Self {
        Self::new(vec![
            ResolutionStrategy::Exact,
            ResolutionStrategy::QualifiedSuffix,
        ])
    }

    /// Entry symbols: exact, suffix, then any name containing the text.
    pub fn for_entry_points() -> Self {
        Self::new(vec![
            ResolutionStrategy::Exact,
            ResolutionStrategy::QualifiedSuffix,
            ResolutionStrategy::Substring,
        ])
    }

    pub fn strategies(&self) -> &[ResolutionStrategy] {
        &self.strategies
    }

    pub fn resolve<'a, T>(&self, candidate: &str, table: &'a T) -> Option<&'a str>
    where
        T: NameLookup + ?Sized,
    {
        if candidate.is_empty() {
            return None;
        }

        for strategy in &self.strategies {
            if let Some(found) = strategy.apply(candidate, table) {
                if *strategy != ResolutionStrategy::Exact {
                    log::debug!("Resolved '{candidate}' to '{found}' via {strategy:?}");
                }
                return Some(found);
            }
        }
        None
    }
}
