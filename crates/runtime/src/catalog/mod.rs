//! Manifest loading into the immutable asset catalog.
//!
//! The catalog is assembled once, before any command is processed: every
//! manifest group is fetched concurrently, records are normalized and
//! validated, and the merged result is frozen behind an `Arc`.
//!
//! A group lists namespace candidates in preference order; only the first one
//! whose manifest exists is loaded (a paid library shadows its free edition).

mod fetcher;

pub use fetcher::{DirectoryFetcher, ManifestFetcher};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use anim_core::{AssetCatalog, AssetEntry, normalize_record, parse_record};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read manifest for '{namespace}'")]
    Io {
        namespace: String,
        #[source]
        source: std::io::Error,
    },
}

/// Namespace candidates of which at most one is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestGroup {
    pub candidates: Vec<String>,
}

impl ManifestGroup {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(namespace: impl Into<String>) -> Self {
        Self {
            candidates: vec![namespace.into()],
        }
    }
}

/// Ordered manifest groups to load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogSpec {
    pub groups: Vec<ManifestGroup>,
}

impl Default for CatalogSpec {
    fn default() -> Self {
        Self {
            groups: vec![
                ManifestGroup::new(["jb2a_patreon", "JB2A_DnD5e"]),
                ManifestGroup::single("animated-spell-effects"),
                ManifestGroup::single("animated-spell-effects-cartoon"),
                ManifestGroup::single("jaamod"),
            ],
        }
    }
}

/// Parses `a|b,c,d`: groups separated by commas, fallbacks by `|`.
impl FromStr for CatalogSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups = s
            .split(',')
            .map(|group| {
                ManifestGroup::new(
                    group
                        .split('|')
                        .map(str::trim)
                        .filter(|namespace| !namespace.is_empty()),
                )
            })
            .filter(|group| !group.candidates.is_empty())
            .collect();
        Ok(Self { groups })
    }
}

impl fmt::Display for CatalogSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: Vec<String> = self
            .groups
            .iter()
            .map(|group| group.candidates.join("|"))
            .collect();
        write!(f, "{}", groups.join(","))
    }
}

/// Normalizes and validates every line of one manifest.
///
/// Returns the accepted entries and the number of dropped lines. Dropped
/// lines are logged, never surfaced to users.
pub fn ingest_manifest(namespace: &str, text: &str) -> (Vec<AssetEntry>, usize) {
    let mut entries = Vec::new();
    let mut dropped = 0;
    for record in text.lines().filter_map(|line| normalize_record(namespace, line)) {
        match parse_record(&record) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                warn!(namespace, "Unknown format: {}", err);
                dropped += 1;
            }
        }
    }
    (entries, dropped)
}

/// Fetches every group and freezes the merged catalog.
///
/// Groups load concurrently but merge in declared order. A group with no
/// available candidate contributes nothing; fetch failures are logged and the
/// next candidate is tried.
pub async fn load_catalog(fetcher: Arc<dyn ManifestFetcher>, spec: &CatalogSpec) -> Arc<AssetCatalog> {
    let mut tasks = JoinSet::new();
    for (index, group) in spec.groups.iter().cloned().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        tasks.spawn(async move { (index, load_group(fetcher.as_ref(), &group).await) });
    }

    let mut loaded = Vec::with_capacity(spec.groups.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => loaded.push(result),
            Err(err) => warn!("manifest task failed: {}", err),
        }
    }
    loaded.sort_by_key(|(index, _)| *index);

    let catalog: AssetCatalog = loaded
        .into_iter()
        .flat_map(|(_, entries)| entries)
        .collect();
    info!("Catalog ready with {} records", catalog.len());
    Arc::new(catalog)
}

async fn load_group(fetcher: &dyn ManifestFetcher, group: &ManifestGroup) -> Vec<AssetEntry> {
    for namespace in &group.candidates {
        match fetcher.fetch(namespace).await {
            Ok(Some(text)) => {
                let (entries, dropped) = ingest_manifest(namespace, &text);
                info!("Loaded {} {} records", entries.len(), namespace);
                if dropped > 0 {
                    debug!(namespace = %namespace, dropped, "dropped malformed records");
                }
                return entries;
            }
            Ok(None) => debug!(namespace = %namespace, "manifest not installed"),
            Err(err) => warn!("{}: {:?}", err, err),
        }
    }
    Vec::new()
}
