//! Platform-specific mesh-index files
//!
//! Compiled models may carry `*.xbox.vtx` and `*.sw.vtx` mesh-index files that
//! PC clients never load. This module finds them and strips them from an
//! archive, either by rewriting the archive directly or by round-tripping it
//! through a scratch directory.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use indicatif::ProgressBar;

use crate::archive::{self, PakArchive, RewriteSummary};
use crate::error::Result;
use crate::rules::VariantKind;
use crate::utils::prune_empty_dirs;

/// A platform-variant entry found in an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantEntry {
    pub name: String,
    /// Uncompressed size in bytes
    pub size: u64,
    pub kind: VariantKind,
}

/// Platform-variant entries of an archive, bucketed by target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantScan {
    pub xbox: Vec<VariantEntry>,
    pub software: Vec<VariantEntry>,
}

impl VariantScan {
    pub fn is_empty(&self) -> bool {
        self.xbox.is_empty() && self.software.is_empty()
    }

    pub fn len(&self) -> usize {
        self.xbox.len() + self.software.len()
    }

    /// Both buckets combined and sorted by name
    pub fn entries(&self) -> Vec<&VariantEntry> {
        let mut entries: Vec<_> = self.xbox.iter().chain(&self.software).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Sum of the uncompressed sizes of every found entry
    pub fn total_size(&self) -> u64 {
        self.xbox.iter().chain(&self.software).map(|e| e.size).sum()
    }

    pub fn names(&self) -> HashSet<String> {
        self.xbox
            .iter()
            .chain(&self.software)
            .map(|e| e.name.clone())
            .collect()
    }
}

/// How matched entries are removed from the archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StripStrategy {
    /// Raw-copy every other entry into a new archive
    #[default]
    Rewrite,
    /// Extract to a scratch directory, delete, prune and recompress
    Scratch,
}

/// Find every platform-variant entry in an archive
pub fn scan(archive: &PakArchive) -> VariantScan {
    let mut scan = VariantScan::default();

    for entry in archive.entries().iter().filter(|e| !e.is_dir) {
        let Some(kind) = VariantKind::from_name(&entry.name) else {
            continue;
        };
        let found = VariantEntry {
            name: entry.name.clone(),
            size: entry.size,
            kind,
        };
        match kind {
            VariantKind::Xbox => scan.xbox.push(found),
            VariantKind::Software => scan.software.push(found),
        }
    }

    tracing::debug!(
        "Found {} xbox and {} sw mesh-index files in {}",
        scan.xbox.len(),
        scan.software.len(),
        archive.path().display()
    );

    scan
}

/// Remove the scanned entries from the archive at `path`
pub fn strip(
    path: &Path,
    scan: &VariantScan,
    strategy: StripStrategy,
    progress: &ProgressBar,
) -> Result<RewriteSummary> {
    let names = scan.names();
    match strategy {
        StripStrategy::Rewrite => archive::remove_entries(path, &names, progress),
        StripStrategy::Scratch => strip_via_scratch(path, &names, progress),
    }
}

fn strip_via_scratch(
    path: &Path,
    names: &HashSet<String>,
    progress: &ProgressBar,
) -> Result<RewriteSummary> {
    let scratch = tempfile::tempdir()?;
    tracing::info!(
        "Extracting {} into {}",
        path.display(),
        scratch.path().display()
    );

    let mut source = PakArchive::open(path)?;
    let ordered: Vec<String> = source.entry_names().map(str::to_string).collect();
    source.extract_all(scratch.path(), progress)?;
    drop(source);

    let removed = delete_from_scratch(scratch.path(), &ordered, names)?;

    progress.reset();
    let kept = archive::pack_directory(scratch.path(), path, progress)?;

    Ok(RewriteSummary { kept, removed })
}

/// Delete the selected entries from an extracted tree and prune emptied directories
///
/// Returns the deleted names in the order of `ordered`.
fn delete_from_scratch(
    root: &Path,
    ordered: &[String],
    names: &HashSet<String>,
) -> Result<Vec<String>> {
    let mut removed = Vec::new();

    for name in ordered.iter().filter(|n| names.contains(*n)) {
        let file = root.join(name);
        match fs::remove_file(&file) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("{} was not extracted, skipping", name);
            }
            Err(e) => return Err(e.into()),
        }
        if let Some(parent) = file.parent() {
            prune_empty_dirs(parent, root)?;
        }
        removed.push(name.clone());
    }

    Ok(removed)
}
