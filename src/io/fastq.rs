//! Discovery of compressed FASTQ files on disk.
//!
//! Only the file name is inspected; the files are never opened.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Double extension every read file must carry to be picked up by a scan.
pub const FASTQ_SUFFIX: &str = ".fastq.gz";

/// Returns true when `file_name` ends with the compressed FASTQ suffix.
pub fn is_fastq_gz(file_name: &str) -> bool {
    file_name.ends_with(FASTQ_SUFFIX)
}

/// Recursively collects every `*.fastq.gz` file below `root`.
///
/// Entries are visited in file-name order so repeated scans of the same tree
/// return the same sequence. Any traversal error (missing root, unreadable
/// directory) is returned to the caller. Only the name decides whether a
/// non-directory entry is kept, so symbolic links to read files count too.
pub fn find_fastq_files(root: &Path) -> Result<Vec<PathBuf>> {
    info!("Scanning directory: {:?}", root);

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to scan directory {}", root.display()))?;
        // Symlinked reads are kept; `Path::is_dir` follows the link.
        if entry.path().is_dir() {
            continue;
        }

        if is_fastq_gz(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        } else {
            debug!("Skipping file without {} suffix: {:?}", FASTQ_SUFFIX, entry.path());
        }
    }

    info!("Found {} FASTQ file(s) under {:?}", files.len(), root);
    Ok(files)
}
