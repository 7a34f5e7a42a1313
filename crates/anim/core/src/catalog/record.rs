//! Manifest record normalization and width extraction.
//!
//! Manifest files list one asset per line as `<relative/path>.<ext>,width=<int>`.
//! Before indexing, a line is rewritten into the compact record form
//! `modules/<namespace>/<path>.<ext>,W:<int>` and the width is extracted from it.
use std::fmt;

use thiserror::Error;

use crate::config::AnimConfig;

/// One playable asset and the pixel width it was authored at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetEntry {
    pub path: String,
    pub native_width: u32,
}

impl AssetEntry {
    /// Creates an entry, rejecting a zero width.
    pub fn new(path: impl Into<String>, native_width: u32) -> Result<Self, RecordError> {
        if native_width == 0 {
            return Err(RecordError::ZeroWidth);
        }
        Ok(Self {
            path: path.into(),
            native_width,
        })
    }

    /// Last path segment, used in diagnostics.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

impl fmt::Display for AssetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.path, AnimConfig::WIDTH_TAG, self.native_width)
    }
}

/// Reasons a manifest record never enters the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("empty record")]
    Empty,

    #[error("record has no width tag: {0}")]
    MissingWidth(String),

    #[error("record is not a playable file: {0}")]
    UnsupportedExtension(String),

    #[error("record width must be positive")]
    ZeroWidth,
}

/// Rewrites a raw manifest line into the compact record form.
///
/// Returns `None` for blank lines.
pub fn normalize_record(namespace: &str, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let line = line.strip_prefix("./").unwrap_or(line);
    let line = line.replacen(AnimConfig::MANIFEST_WIDTH_MARKER, AnimConfig::WIDTH_TAG, 1);
    Some(format!("{}{}/{}", AnimConfig::NAMESPACE_ROOT, namespace, line))
}

/// Extracts the asset path and width from a compact record.
///
/// The record must contain `.<ext>,W:<digits>` where `<ext>` is one of
/// [`AnimConfig::PLAYABLE_EXTENSIONS`]. Anything after the digits is ignored.
pub fn parse_record(record: &str) -> Result<AssetEntry, RecordError> {
    let record = record.trim();
    if record.is_empty() {
        return Err(RecordError::Empty);
    }

    let (path, tail) = record
        .split_once(AnimConfig::WIDTH_TAG)
        .ok_or_else(|| RecordError::MissingWidth(record.to_string()))?;

    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(RecordError::MissingWidth(record.to_string()));
    }

    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.contains('/'))
        .ok_or_else(|| RecordError::UnsupportedExtension(record.to_string()))?;
    if !AnimConfig::PLAYABLE_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(extension))
    {
        return Err(RecordError::UnsupportedExtension(record.to_string()));
    }

    // Saturate absurd widths instead of failing the whole record.
    let width = digits.parse::<u32>().unwrap_or(u32::MAX);
    AssetEntry::new(path, width)
}
