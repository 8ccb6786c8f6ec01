//! Pakfile archive reading and rewriting
//!
//! Map pakfiles are exported as plain ZIP archives. Entries are never patched
//! in place: every modification writes a complete replacement archive into a
//! temporary file beside the original and then renames it over the original,
//! so a failure part way through leaves the original untouched.

use std::collections::HashSet;
use std::fs::{self, File, Permissions};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// A single entry in a pakfile archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakEntry {
    /// Entry name/path within the archive
    pub name: String,
    /// Uncompressed size in bytes
    pub size: u64,
    /// Stored (compressed) size in bytes
    pub compressed_size: u64,
    /// Whether the entry is a directory marker
    pub is_dir: bool,
}

/// A pakfile archive reader
pub struct PakArchive {
    path: PathBuf,
    zip: ZipArchive<BufReader<File>>,
    entries: Vec<PakEntry>,
}

impl PakArchive {
    /// Open an archive and read its central directory
    ///
    /// # Example
    /// ```no_run
    /// use pakprune::PakArchive;
    /// let archive = PakArchive::open("de_dust_pak.zip")?;
    /// for entry in archive.entries() {
    ///     println!("{} ({} bytes)", entry.name, entry.size);
    /// }
    /// # Ok::<(), pakprune::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut zip = ZipArchive::new(BufReader::new(file))
            .map_err(|e| Error::InvalidArchive(format!("{}: {}", path.display(), e)))?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let file = zip.by_index_raw(i)?;
            entries.push(PakEntry {
                name: file.name().to_string(),
                size: file.size(),
                compressed_size: file.compressed_size(),
                is_dir: file.is_dir(),
            });
        }

        tracing::debug!("Opened {} with {} entries", path.display(), entries.len());

        Ok(Self { path, zip, entries })
    }

    /// Path the archive was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in central directory order
    pub fn entries(&self) -> &[PakEntry] {
        &self.entries
    }

    /// Iterate over entry names in central directory order
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Collect every entry name into a set
    pub fn name_set(&self) -> HashSet<String> {
        self.entry_names().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extract every entry below `dest`, preserving relative paths
    ///
    /// Entries whose names would resolve outside `dest` are rejected with
    /// [`Error::UnsafeEntryPath`]. Returns the number of files written.
    pub fn extract_all(&mut self, dest: &Path, progress: &ProgressBar) -> Result<usize> {
        progress.set_length(self.zip.len() as u64);

        let mut extracted = 0;
        for i in 0..self.zip.len() {
            let mut file = self.zip.by_index(i)?;
            let relative = file
                .enclosed_name()
                .ok_or_else(|| Error::UnsafeEntryPath(file.name().to_string()))?;
            let target = dest.join(relative);
            progress.set_message(file.name().to_string());

            if file.is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut out = File::create(&target)?;
                io::copy(&mut file, &mut out)?;
                extracted += 1;
            }

            progress.inc(1);
        }

        Ok(extracted)
    }
}

/// Outcome of rewriting an archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Number of entries carried into the new archive
    pub kept: usize,
    /// Names of entries left out, in original order
    pub removed: Vec<String>,
}

/// Rewrite an archive in place, keeping only entries accepted by `keep`
///
/// Kept entries are raw-copied in their original order, so their compressed
/// payloads, CRCs and timestamps are unchanged. The replacement is written to
/// a temporary file in the same directory and renamed over `path` only after
/// it has been fully written, and it takes over the original's permissions.
pub fn rewrite_archive<F>(
    path: &Path,
    mut keep: F,
    progress: &ProgressBar,
) -> Result<RewriteSummary>
where
    F: FnMut(&str) -> bool,
{
    let mut summary = RewriteSummary::default();
    let permissions = fs::metadata(path)?.permissions();
    let temp = temp_archive_beside(path)?;

    let temp = {
        let mut source = ZipArchive::new(BufReader::new(File::open(path)?))
            .map_err(|e| Error::InvalidArchive(format!("{}: {}", path.display(), e)))?;
        let mut writer = ZipWriter::new(BufWriter::new(temp));

        progress.set_length(source.len() as u64);

        for i in 0..source.len() {
            let file = source.by_index_raw(i)?;
            let name = file.name().to_string();
            progress.set_message(name.clone());

            if keep(&name) {
                writer.raw_copy_file(file)?;
                summary.kept += 1;
            } else {
                tracing::debug!("Dropping {}", name);
                summary.removed.push(name);
            }

            progress.inc(1);
        }

        writer
            .finish()?
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?
    };

    persist(temp, path, Some(permissions))?;

    tracing::info!(
        "Rewrote {}: kept {}, removed {}",
        path.display(),
        summary.kept,
        summary.removed.len()
    );

    Ok(summary)
}

/// Rewrite an archive in place without the named entries
pub fn remove_entries(
    path: &Path,
    names: &HashSet<String>,
    progress: &ProgressBar,
) -> Result<RewriteSummary> {
    rewrite_archive(path, |name| !names.contains(name), progress)
}

/// Compress every file below `source_dir` into a new archive at `output`
///
/// Entry names are relative to `source_dir`, use `/` separators and are added
/// in sorted order. Empty directories are not recorded. If `output` already
/// exists it is replaced only after the new archive is complete and keeps its
/// permissions. Returns the number of files packed.
pub fn pack_directory(source_dir: &Path, output: &Path, progress: &ProgressBar) -> Result<usize> {
    let files = collect_relative_files(source_dir)?;
    let permissions = fs::metadata(output).ok().map(|m| m.permissions());
    progress.set_length(files.len() as u64);

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(BufWriter::new(temp_archive_beside(output)?));

    for (full_path, archive_name) in &files {
        progress.set_message(archive_name.clone());
        writer.start_file(archive_name.as_str(), options)?;
        let mut input = File::open(full_path)?;
        io::copy(&mut input, &mut writer)?;
        progress.inc(1);
    }

    let temp = writer
        .finish()?
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    persist(temp, output, permissions)?;

    tracing::info!("Packed {} files into {}", files.len(), output.display());

    Ok(files.len())
}

/// Files below `dir` paired with their archive names
fn collect_relative_files(dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(io::Error::from(e)))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| Error::UnsafeEntryPath(entry.path().display().to_string()))?;
        let archive_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        files.push((entry.path().to_path_buf(), archive_name));
    }

    Ok(files)
}

/// Create a temporary file next to `path` so the final rename stays on one filesystem
fn temp_archive_beside(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok(tempfile::Builder::new()
        .prefix(".pakprune-")
        .suffix(".tmp")
        .tempfile_in(dir)?)
}

fn persist(temp: NamedTempFile, path: &Path, permissions: Option<Permissions>) -> Result<()> {
    // Temporary files are created owner-only
    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
