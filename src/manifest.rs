//! Manifest lists of stock entry names
//!
//! A manifest is a plain text file with one archive entry name per line.
//! Surrounding whitespace is trimmed and blank lines are ignored.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A set of entry names loaded from a line-delimited list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    names: HashSet<String>,
}

impl Manifest {
    /// Load a manifest from disk
    ///
    /// A missing file is reported as [`Error::ManifestNotFound`] so callers can
    /// tell it apart from other read failures.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ManifestNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;

        let manifest = Self::parse(&text);
        tracing::debug!("Loaded {} names from {}", manifest.len(), path.display());
        Ok(manifest)
    }

    /// Parse manifest text
    pub fn parse(text: &str) -> Self {
        text.lines().collect()
    }

    /// Check whether a name is listed
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Iterate over the listed names in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Manifest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let names = iter
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Self { names }
    }
}

/// Locations of the three manifest files
#[derive(Debug, Clone)]
pub struct ManifestPaths {
    pub textures: PathBuf,
    pub models: PathBuf,
    pub sounds: PathBuf,
}

impl ManifestPaths {
    /// Conventional file names inside a single directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            textures: dir.join("default_textures.txt"),
            models: dir.join("default_models.txt"),
            sounds: dir.join("default_sounds.txt"),
        }
    }
}

/// The three manifests the matcher compares against
#[derive(Debug, Clone, Default)]
pub struct Manifests {
    pub textures: Manifest,
    pub models: Manifest,
    pub sounds: Manifest,
}

impl Manifests {
    /// Load all three manifests, failing on the first one that cannot be read
    pub fn load(paths: &ManifestPaths) -> Result<Self> {
        Ok(Self {
            textures: Manifest::load(&paths.textures)?,
            models: Manifest::load(&paths.models)?,
            sounds: Manifest::load(&paths.sounds)?,
        })
    }
}
