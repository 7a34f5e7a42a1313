//! Sources of manifest text.
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::CatalogError;

/// Fetches the raw manifest for a namespace.
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    /// Returns `Ok(None)` when the namespace is not installed.
    async fn fetch(&self, namespace: &str) -> Result<Option<String>, CatalogError>;
}

/// Reads `<root>/<namespace>.txt` from disk.
#[derive(Clone, Debug)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn manifest_path(&self, namespace: &str) -> PathBuf {
        self.root.join(format!("{}.txt", namespace))
    }
}

#[async_trait]
impl ManifestFetcher for DirectoryFetcher {
    async fn fetch(&self, namespace: &str) -> Result<Option<String>, CatalogError> {
        match tokio::fs::read_to_string(self.manifest_path(namespace)).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CatalogError::Io {
                namespace: namespace.to_string(),
                source,
            }),
        }
    }
}
