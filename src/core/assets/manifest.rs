//=========================================================================
// Asset Manifest
//=========================================================================
//
// The fixed list of remote resources the shell needs before it becomes
// interactive. Each entry is keyed by the last path segment of its URL;
// that key names both the local persisted file and the store entry.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use reqwest::Url;

//=== Internal Dependencies ===============================================

use crate::core::error::ConfigurationError;

//=== AssetKind ===========================================================

/// Decoder family of a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Font,
    Image,
}

//=== ManifestEntry =======================================================

/// One declared remote asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub kind: AssetKind,
    pub location: String,
}

impl ManifestEntry {
    pub fn new(kind: AssetKind, location: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
        }
    }

    /// Store key derived from the location (its final path segment).
    ///
    /// Falls back to a plain split on `/` when the location is not an
    /// absolute URL; [`Manifest::validate`] rejects such entries anyway.
    pub fn key(&self) -> String {
        match Url::parse(&self.location) {
            Ok(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or_default()
                .to_string(),
            Err(_) => self
                .location
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

//=== Manifest ============================================================

/// Union of all font and image entries, defined once at startup.
///
/// ```
/// use lumen_shell::core::assets::Manifest;
///
/// let manifest = Manifest::new()
///     .font("https://example.com/fonts/Mono.ttf")
///     .image("https://example.com/img/logo.png");
/// assert_eq!(manifest.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, location: impl Into<String>) -> Self {
        self.entries.push(ManifestEntry::new(AssetKind::Font, location));
        self
    }

    pub fn image(mut self, location: impl Into<String>) -> Self {
        self.entries.push(ManifestEntry::new(AssetKind::Image, location));
        self
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks every location is an absolute URL with a file name and that
    /// no two entries share a key.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::with_capacity(self.entries.len());

        for entry in &self.entries {
            if Url::parse(&entry.location).is_err() {
                return Err(ConfigurationError::InvalidLocation(entry.location.clone()));
            }

            let key = entry.key();
            if key.is_empty() {
                return Err(ConfigurationError::EmptyKey(entry.location.clone()));
            }
            if !seen.insert(key.clone()) {
                return Err(ConfigurationError::DuplicateKey(key));
            }
        }

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
