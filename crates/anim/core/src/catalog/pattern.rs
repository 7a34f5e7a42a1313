//! Case-insensitive wildcard matching for asset searches.
//!
//! `*` matches any (possibly empty) substring; every other character, `/`
//! included, is literal. Patterns are unanchored: `fire*bolt` matches any
//! path that contains `fire` followed somewhere later by `bolt`.

/// Compiled search pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPattern {
    segments: Vec<String>,
}

impl AssetPattern {
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('*')
            .filter(|segment| !segment.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { segments }
    }

    /// Returns true if every literal segment occurs in order within `path`.
    pub fn matches(&self, path: &str) -> bool {
        let haystack = path.to_lowercase();
        let mut rest = haystack.as_str();
        for segment in &self.segments {
            match rest.find(segment.as_str()) {
                Some(at) => rest = &rest[at + segment.len()..],
                None => return false,
            }
        }
        true
    }
}
