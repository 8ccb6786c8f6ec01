//! General utility functions for pakprune
//!
//! This module contains common helper functions used across the library.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a file size in human-readable form (B, KB, MB, GB, TB)
///
/// Each step divides by 1024 and the value is always printed with two
/// decimals, so `300` becomes `"300.00 B"` and `1572864` becomes `"1.50 MB"`.
pub fn format_size(size: u64) -> String {
    let mut value = size as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// Remove `start` and its ancestors while they are empty, stopping at `root`
///
/// `root` itself is never removed, and nothing outside it is touched.
pub fn prune_empty_dirs(start: &Path, root: &Path) -> Result<()> {
    let mut current = start;

    while current != root && current.starts_with(root) {
        match fs::remove_dir(current) {
            Ok(()) => tracing::debug!("Removed empty directory {}", current.display()),
            // Not empty (or already gone): nothing above it can be empty either
            Err(e) if e.kind() == ErrorKind::NotFound || is_dir_not_empty(current) => break,
            Err(e) => return Err(e.into()),
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    Ok(())
}

fn is_dir_not_empty(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Create a progress bar with the standard template
pub fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
