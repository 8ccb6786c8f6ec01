//! # pakprune
//!
//! A Rust library for trimming Source engine map pakfiles.
//!
//! ## Overview
//!
//! Maps often ship a pakfile (exported as a `.zip`) that carries copies of
//! stock game content and mesh-index files for hardware the game no longer
//! targets. This library provides:
//!
//! - Reading pakfile archives and listing their entries
//! - Matching entries against manifests of stock textures, models and sounds,
//!   including the sidecar files that travel with each model
//! - Finding `*.xbox.vtx` and `*.sw.vtx` mesh-index files
//! - Rewriting an archive without selected entries, replacing the original
//!   only once the new archive is complete
//!
//! ## Example - Matching
//!
//! ```rust,no_run
//! use pakprune::{match_entries, ManifestPaths, Manifests, PakArchive};
//!
//! fn main() -> pakprune::Result<()> {
//!     let manifests = Manifests::load(&ManifestPaths::in_dir("lists"))?;
//!     let archive = PakArchive::open("de_example_pak.zip")?;
//!
//!     let result = match_entries(&archive.name_set(), &manifests);
//!     for name in &result.models {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Example - Removing entries
//!
//! ```rust,no_run
//! use indicatif::ProgressBar;
//! use pakprune::archive::rewrite_archive;
//! use std::path::Path;
//!
//! fn main() -> pakprune::Result<()> {
//!     let summary = rewrite_archive(
//!         Path::new("de_example_pak.zip"),
//!         |name| !name.ends_with(".xbox.vtx"),
//!         &ProgressBar::hidden(),
//!     )?;
//!     println!("Removed {} entries", summary.removed.len());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod confirm;
pub mod error;
pub mod manifest;
pub mod matcher;
pub mod pak_utils;
pub mod rules;
pub mod utils;
pub mod variants;

#[cfg(test)]
mod test_support;

pub use archive::{PakArchive, PakEntry, RewriteSummary};
pub use confirm::{is_affirmative, AlwaysAccept, AlwaysDecline, Confirm};
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestPaths, Manifests};
pub use matcher::{match_entries, MatchResult};
pub use pak_utils::PassOutcome;
pub use utils::format_size;
pub use variants::{StripStrategy, VariantEntry, VariantScan};
