//! Pakfile optimisation passes
//!
//! This module contains the two user-facing passes: removing stock content
//! listed in manifests, and stripping platform-specific mesh-index files.
//! Both print their findings, ask a [`Confirm`] before touching the archive,
//! and report what they did.

use std::path::Path;

use crate::archive::{self, PakArchive, RewriteSummary};
use crate::confirm::Confirm;
use crate::error::Result;
use crate::manifest::{ManifestPaths, Manifests};
use crate::matcher::{match_entries, MatchResult};
use crate::utils::{format_size, progress_bar};
use crate::variants::{self, StripStrategy, VariantScan};

/// What a pass ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Nothing in the archive matched
    NothingFound,
    /// Matches were found but removal was declined
    Declined { found: usize },
    /// Matches were removed
    Removed(RewriteSummary),
}

/// Compare an archive with the stock manifests and remove matches on confirmation
///
/// All three manifests are loaded before the archive is opened, so a missing
/// manifest aborts the pass without reading or touching the archive.
pub fn compare_with_manifests<C: Confirm + ?Sized>(
    archive_path: &Path,
    manifest_paths: &ManifestPaths,
    confirm: &mut C,
) -> Result<PassOutcome> {
    let manifests = Manifests::load(manifest_paths)?;

    let names = PakArchive::open(archive_path)?.name_set();
    let result = match_entries(&names, &manifests);

    if result.is_empty() {
        println!("No matching textures, models, or sounds from the default lists were found.");
        return Ok(PassOutcome::NothingFound);
    }

    print_matches(&result);

    if !confirm.confirm("Do you want to delete the matching files? (yes/no)") {
        println!("\nNo files were deleted.");
        return Ok(PassOutcome::Declined {
            found: result.len(),
        });
    }

    let pb = progress_bar(0);
    let summary = archive::remove_entries(archive_path, &result.all_names(), &pb)?;
    pb.finish_and_clear();

    println!("\nDeleted {} matching files.", summary.removed.len());

    Ok(PassOutcome::Removed(summary))
}

fn print_matches(result: &MatchResult) {
    let sections = [
        ("Textures", &result.textures),
        ("Models", &result.models),
        ("Sounds", &result.sounds),
    ];

    for (title, names) in sections {
        if names.is_empty() {
            continue;
        }
        println!("\n{} found:", title);
        for name in names {
            println!("- {}", name);
        }
    }
}

/// Find platform-specific mesh-index files and strip them on confirmation
pub fn strip_platform_variants<C: Confirm + ?Sized>(
    archive_path: &Path,
    strategy: StripStrategy,
    confirm: &mut C,
) -> Result<PassOutcome> {
    let scan = variants::scan(&PakArchive::open(archive_path)?);

    if scan.is_empty() {
        println!("No *.xbox.vtx or *.sw.vtx files were found.");
        return Ok(PassOutcome::NothingFound);
    }

    print_variants(&scan);

    if !confirm.confirm("Would you like to delete these VTX files? (yes/no)") {
        println!("\nNo VTX files were deleted.");
        return Ok(PassOutcome::Declined { found: scan.len() });
    }

    let pb = progress_bar(0);
    let summary = variants::strip(archive_path, &scan, strategy, &pb)?;
    pb.finish_and_clear();

    println!("\nOriginal archive has been updated: {}", archive_path.display());

    Ok(PassOutcome::Removed(summary))
}

fn print_variants(scan: &VariantScan) {
    println!("\nFound {} VTX file(s):", scan.len());
    for entry in scan.entries() {
        println!(" - {} ({})", entry.name, format_size(entry.size));
    }
    println!(
        "\nTotal size of found VTX files: {}",
        format_size(scan.total_size())
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AlwaysAccept, AlwaysDecline};
    use crate::error::Error;
    use crate::test_support::{entry_names, raw_entries, write_zip};
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        archive: std::path::PathBuf,
        manifests: ManifestPaths,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("map_pak.zip");
        write_zip(
            &archive,
            &[
                ("tex/brick.vtf", b"brick"),
                ("tex/custom.vtf", b"custom"),
                ("models/crate.mdl", b"IDST"),
                ("models/crate.vvd", b"IDSV"),
                ("models/crate.phy", b"VPHY"),
                ("models/crate.sw.vtx", &[7u8; 64]),
                ("models/mine.mdl", b"IDST mine"),
                ("sound/ambient/wind.wav", b"RIFF"),
            ],
        );

        let manifests = ManifestPaths::in_dir(dir.path());
        fs::write(&manifests.textures, "tex/brick.vtf\ntex/other.vtf\n").unwrap();
        fs::write(&manifests.models, "models/crate.mdl\n").unwrap();
        fs::write(&manifests.sounds, "\nsound/ambient/wind.wav\n\n").unwrap();

        Fixture {
            _dir: dir,
            archive,
            manifests,
        }
    }

    #[test]
    fn test_compare_removes_matches_on_confirmation() {
        let fx = fixture();
        let before = raw_entries(&fx.archive);

        let mut prompts = 0;
        let outcome = compare_with_manifests(&fx.archive, &fx.manifests, &mut |_: &str| {
            prompts += 1;
            true
        })
        .unwrap();

        assert_eq!(prompts, 1);
        let removed = [
            "tex/brick.vtf",
            "models/crate.mdl",
            "models/crate.vvd",
            "models/crate.phy",
            "models/crate.sw.vtx",
            "sound/ambient/wind.wav",
        ];
        match outcome {
            PassOutcome::Removed(summary) => {
                assert_eq!(summary.kept, 2);
                assert_eq!(summary.removed.len(), removed.len());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let expected: Vec<_> = before
            .into_iter()
            .filter(|(name, _)| !removed.contains(&name.as_str()))
            .collect();
        assert_eq!(raw_entries(&fx.archive), expected);
    }

    #[test]
    fn test_compare_declined_leaves_archive_untouched() {
        let fx = fixture();
        let before = fs::read(&fx.archive).unwrap();

        let outcome =
            compare_with_manifests(&fx.archive, &fx.manifests, &mut AlwaysDecline).unwrap();

        assert_eq!(outcome, PassOutcome::Declined { found: 6 });
        assert_eq!(fs::read(&fx.archive).unwrap(), before);
    }

    #[test]
    fn test_compare_missing_manifest_aborts_before_prompting() {
        let fx = fixture();
        fs::remove_file(&fx.manifests.sounds).unwrap();
        let before = fs::read(&fx.archive).unwrap();

        let mut asked = false;
        let result = compare_with_manifests(&fx.archive, &fx.manifests, &mut |_: &str| {
            asked = true;
            true
        });

        assert!(matches!(result, Err(Error::ManifestNotFound { .. })));
        assert!(!asked);
        assert_eq!(fs::read(&fx.archive).unwrap(), before);
    }

    #[test]
    fn test_compare_nothing_found_does_not_prompt() {
        let fx = fixture();
        fs::write(&fx.manifests.textures, "").unwrap();
        fs::write(&fx.manifests.models, "models/absent.mdl\n").unwrap();
        fs::write(&fx.manifests.sounds, "").unwrap();

        let outcome = compare_with_manifests(&fx.archive, &fx.manifests, &mut |_: &str| -> bool {
            panic!("should not prompt")
        })
        .unwrap();

        assert_eq!(outcome, PassOutcome::NothingFound);
    }

    #[test]
    fn test_strip_variants_example() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pak.zip");
        write_zip(
            &archive,
            &[
                ("x.xbox.vtx", &[0u8; 100]),
                ("y.sw.vtx", &[1u8; 200]),
                ("z.dx90.vtx", b"kept"),
            ],
        );

        let scan = variants::scan(&PakArchive::open(&archive).unwrap());
        assert_eq!(format_size(scan.total_size()), "300.00 B");

        let outcome =
            strip_platform_variants(&archive, StripStrategy::Rewrite, &mut AlwaysAccept).unwrap();

        assert!(matches!(outcome, PassOutcome::Removed(_)));
        assert_eq!(entry_names(&archive), vec!["z.dx90.vtx"]);
    }

    #[test]
    fn test_strip_variants_declined() {
        let fx = fixture();
        let before = fs::read(&fx.archive).unwrap();

        let outcome =
            strip_platform_variants(&fx.archive, StripStrategy::Scratch, &mut AlwaysDecline)
                .unwrap();

        assert_eq!(outcome, PassOutcome::Declined { found: 1 });
        assert_eq!(fs::read(&fx.archive).unwrap(), before);
    }

    #[test]
    fn test_both_passes_in_sequence() {
        let fx = fixture();
        fs::write(&fx.manifests.models, "").unwrap();

        compare_with_manifests(&fx.archive, &fx.manifests, &mut AlwaysAccept).unwrap();
        let outcome =
            strip_platform_variants(&fx.archive, StripStrategy::Rewrite, &mut AlwaysAccept)
                .unwrap();

        assert!(matches!(outcome, PassOutcome::Removed(_)));
        assert_eq!(
            entry_names(&fx.archive),
            vec![
                "tex/custom.vtf",
                "models/crate.mdl",
                "models/crate.vvd",
                "models/crate.phy",
                "models/mine.mdl",
            ]
        );
    }

    #[test]
    fn test_strip_variants_missing_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = strip_platform_variants(
            &dir.path().join("missing.zip"),
            StripStrategy::Rewrite,
            &mut AlwaysAccept,
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
