//! Candidate provider for completion suggestions
//!
//! The engine never reads catalogs directly; it asks a [`CandidateProvider`].
//! The built-in provider serves the static catalogs, and
//! [`ConfiguredProvider`] layers user-defined entries (custom filters or
//! functions registered by a Pebble extension) on top of them.

use std::collections::HashMap;

use super::catalog::{CatalogEntry, CatalogKind, catalog};

/// Trait for providing completion candidates
pub trait CandidateProvider: Send + Sync {
    /// Statement keywords
    fn keywords(&self) -> Vec<CatalogEntry>;

    /// Operators valid in statements and expressions
    fn operators(&self) -> Vec<CatalogEntry>;

    /// Filters offered after a pipe
    fn filters(&self) -> Vec<CatalogEntry>;

    /// Functions offered at identifier positions
    fn functions(&self) -> Vec<CatalogEntry>;

    /// Tests offered after `is`
    fn tests(&self) -> Vec<CatalogEntry>;

    /// Properties of `loop`
    fn loop_variables(&self) -> Vec<CatalogEntry>;

    /// Entries for a catalog kind
    fn entries(&self, kind: CatalogKind) -> Vec<CatalogEntry> {
        match kind {
            CatalogKind::Keywords => self.keywords(),
            CatalogKind::Operators => self.operators(),
            CatalogKind::Filters => self.filters(),
            CatalogKind::Functions => self.functions(),
            CatalogKind::Tests => self.tests(),
            CatalogKind::LoopVariables => self.loop_variables(),
        }
    }
}

/// Serves the built-in static catalogs
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProvider;

impl BuiltinProvider {
    pub fn new() -> Self {
        Self
    }

    fn builtin(kind: CatalogKind) -> Vec<CatalogEntry> {
        catalog(kind).entries().to_vec()
    }
}

impl CandidateProvider for BuiltinProvider {
    fn keywords(&self) -> Vec<CatalogEntry> {
        Self::builtin(CatalogKind::Keywords)
    }

    fn operators(&self) -> Vec<CatalogEntry> {
        Self::builtin(CatalogKind::Operators)
    }

    fn filters(&self) -> Vec<CatalogEntry> {
        Self::builtin(CatalogKind::Filters)
    }

    fn functions(&self) -> Vec<CatalogEntry> {
        Self::builtin(CatalogKind::Functions)
    }

    fn tests(&self) -> Vec<CatalogEntry> {
        Self::builtin(CatalogKind::Tests)
    }

    fn loop_variables(&self) -> Vec<CatalogEntry> {
        Self::builtin(CatalogKind::LoopVariables)
    }
}

/// Built-in catalogs extended with user-defined entries
///
/// Extra entries are appended after the built-in ones. An extra entry whose
/// name already exists in the same catalog is dropped, so names stay unique.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredProvider {
    extra: HashMap<CatalogKind, Vec<CatalogEntry>>,
}

impl ConfiguredProvider {
    /// Create a provider with additional entries per catalog
    ///
    /// # Arguments
    /// * `extra` - `(catalog, entry)` pairs, in the order they should appear
    pub fn new<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (CatalogKind, CatalogEntry)>,
    {
        let mut grouped: HashMap<CatalogKind, Vec<CatalogEntry>> = HashMap::new();
        for (kind, entry) in extra {
            grouped.entry(kind).or_default().push(entry);
        }
        Self { extra: grouped }
    }

    fn merged(&self, kind: CatalogKind) -> Vec<CatalogEntry> {
        let mut entries = catalog(kind).entries().to_vec();
        if let Some(extra) = self.extra.get(&kind) {
            for entry in extra {
                if entries.iter().any(|e| e.name == entry.name) {
                    tracing::debug!(
                        catalog = %kind,
                        name = %entry.name,
                        "skipping duplicate custom entry"
                    );
                    continue;
                }
                entries.push(entry.clone());
            }
        }
        entries
    }
}

impl CandidateProvider for ConfiguredProvider {
    fn keywords(&self) -> Vec<CatalogEntry> {
        self.merged(CatalogKind::Keywords)
    }

    fn operators(&self) -> Vec<CatalogEntry> {
        self.merged(CatalogKind::Operators)
    }

    fn filters(&self) -> Vec<CatalogEntry> {
        self.merged(CatalogKind::Filters)
    }

    fn functions(&self) -> Vec<CatalogEntry> {
        self.merged(CatalogKind::Functions)
    }

    fn tests(&self) -> Vec<CatalogEntry> {
        self.merged(CatalogKind::Tests)
    }

    fn loop_variables(&self) -> Vec<CatalogEntry> {
        self.merged(CatalogKind::LoopVariables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_matches_static_catalogs() {
        let provider = BuiltinProvider::new();
        for kind in CatalogKind::ALL {
            assert_eq!(provider.entries(kind), catalog(kind).entries());
        }
    }

    #[test]
    fn test_configured_appends_custom_filter() {
        let provider = ConfiguredProvider::new([(
            CatalogKind::Filters,
            CatalogEntry::new("slugify", "Make URL slug"),
        )]);

        let filters = provider.filters();
        assert_eq!(filters.len(), 28);
        assert_eq!(filters.last().unwrap().name, "slugify");
        assert_eq!(provider.functions().len(), 6);
    }

    #[test]
    fn test_configured_skips_duplicate_names() {
        let provider = ConfiguredProvider::new([
            (
                CatalogKind::Filters,
                CatalogEntry::new("upper", "Shadowed upper"),
            ),
            (
                CatalogKind::Functions,
                CatalogEntry::new("now", "Current time").with_template("now()"),
            ),
        ]);

        let filters = provider.filters();
        assert_eq!(filters.len(), 27);
        let upper = filters.iter().find(|e| e.name == "upper").unwrap();
        assert_eq!(upper.detail, "Convert to uppercase");

        let functions = provider.functions();
        assert_eq!(functions.len(), 7);
        assert_eq!(
            functions.last().unwrap().insert_template.as_deref(),
            Some("now()")
        );
    }
}
