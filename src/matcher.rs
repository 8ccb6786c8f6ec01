//! Matching archive entries against stock-content manifests

use std::collections::{BTreeSet, HashSet};

use crate::manifest::{Manifest, Manifests};
use crate::rules::{associated_names, is_model};

/// Entries found in both the archive and a manifest
///
/// Each list is sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub textures: Vec<String>,
    /// Matched models together with their sidecars present in the archive
    pub models: Vec<String>,
    pub sounds: Vec<String>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty() && self.models.is_empty() && self.sounds.is_empty()
    }

    /// Total number of matched entries across all three lists
    pub fn len(&self) -> usize {
        self.textures.len() + self.models.len() + self.sounds.len()
    }

    /// Every matched name, ready to be removed from the archive
    pub fn all_names(&self) -> HashSet<String> {
        self.textures
            .iter()
            .chain(&self.models)
            .chain(&self.sounds)
            .cloned()
            .collect()
    }
}

/// Compare archive entry names against the three manifests
pub fn match_entries(archive_names: &HashSet<String>, manifests: &Manifests) -> MatchResult {
    MatchResult {
        textures: intersect(archive_names, &manifests.textures),
        models: match_models(archive_names, &manifests.models),
        sounds: intersect(archive_names, &manifests.sounds),
    }
}

/// Sorted intersection of a manifest with the archive's names
fn intersect(archive_names: &HashSet<String>, manifest: &Manifest) -> Vec<String> {
    manifest
        .iter()
        .filter(|name| archive_names.contains(*name))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Listed models present in the archive, each expanded to its sidecars
fn match_models(archive_names: &HashSet<String>, manifest: &Manifest) -> Vec<String> {
    let mut found = BTreeSet::new();

    for name in archive_names
        .iter()
        .filter(|name| is_model(name) && manifest.contains(name))
    {
        found.extend(expand_model(archive_names, name));
    }

    found.into_iter().collect()
}

/// A model plus whichever of its sidecars exist in the archive
///
/// Sidecars missing from the archive are skipped; the model itself is always
/// part of the result.
pub fn expand_model(archive_names: &HashSet<String>, model: &str) -> Vec<String> {
    let mut names: Vec<String> = associated_names(model)
        .into_iter()
        .filter(|sidecar| archive_names.contains(sidecar))
        .collect();
    tracing::debug!("{} has {} sidecars in archive", model, names.len());
    names.push(model.to_string());
    names
}
