//! In-memory asset catalog.
//!
//! The catalog is built once from manifest records and is read-only
//! afterwards. Loading the manifests is the runtime's job; this module only
//! indexes entries and answers searches.
mod pattern;
mod record;

pub use pattern::AssetPattern;
pub use record::{AssetEntry, RecordError, normalize_record, parse_record};

use crate::config::AnimConfig;

/// Immutable, searchable set of assets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetCatalog {
    entries: Vec<AssetEntry>,
}

impl AssetCatalog {
    pub fn new(entries: Vec<AssetEntry>) -> Self {
        Self { entries }
    }

    /// Builds a catalog from compact records, returning the rejected ones.
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a str>,
    ) -> (Self, Vec<RecordError>) {
        let mut entries = Vec::new();
        let mut rejected = Vec::new();
        for record in records {
            match parse_record(record) {
                Ok(entry) => entries.push(entry),
                Err(err) => rejected.push(err),
            }
        }
        (Self { entries }, rejected)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetEntry> {
        self.entries.iter()
    }

    /// Finds assets for a command's asset token.
    ///
    /// A token starting with [`AnimConfig::LITERAL_PATH_MARKER`] names one asset:
    /// the catalog entry with that exact path (ignoring case), or else the token
    /// itself read as a `<path>,W:<width>` record. Any other token is a
    /// wildcard search. Zero results is an empty vector, never an error.
    pub fn find_matching(&self, token: &str) -> Vec<AssetEntry> {
        if let Some(literal) = token.strip_prefix(AnimConfig::LITERAL_PATH_MARKER) {
            return self
                .entries
                .iter()
                .find(|entry| entry.path.eq_ignore_ascii_case(literal))
                .cloned()
                .or_else(|| parse_record(literal).ok())
                .into_iter()
                .collect();
        }

        let pattern = AssetPattern::new(token);
        self.entries
            .iter()
            .filter(|entry| pattern.matches(&entry.path))
            .cloned()
            .collect()
    }

    /// Human-readable dump: a total line followed by each path without the
    /// namespace root.
    pub fn listing(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        lines.push(format!("Total: {}", self.entries.len()));
        lines.extend(self.entries.iter().map(|entry| {
            entry
                .path
                .strip_prefix(AnimConfig::NAMESPACE_ROOT)
                .unwrap_or(&entry.path)
                .to_string()
        }));
        lines
    }
}

impl FromIterator<AssetEntry> for AssetCatalog {
    fn from_iter<T: IntoIterator<Item = AssetEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<AssetEntry> for AssetCatalog {
    fn extend<T: IntoIterator<Item = AssetEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
