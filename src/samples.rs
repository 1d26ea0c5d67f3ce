//! Grouping of read files into samples.
//!
//! A sample is identified by the part of the file name before the first
//! underscore. Each file is slotted as the forward (`_R1`) or reverse (`_R2`)
//! read of its sample; files carrying neither marker are reported and left out.

use anyhow::Result;
use indexmap::IndexMap;
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::io::fastq::find_fastq_files;

/// Infix marking the forward read of a pair.
pub const FORWARD_MARKER: &str = "_R1";
/// Infix marking the reverse read of a pair.
pub const REVERSE_MARKER: &str = "_R2";

/// Direction of a read file within a paired-end sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadDirection {
    Forward,
    Reverse,
}

/// The two read slots of a sample. A slot stays `None` until a matching file
/// is seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplePair {
    pub forward: Option<PathBuf>,
    pub reverse: Option<PathBuf>,
}

impl SamplePair {
    /// Stores `path` in the slot for `direction`, replacing any earlier file.
    pub fn set(&mut self, direction: ReadDirection, path: PathBuf) {
        match direction {
            ReadDirection::Forward => self.forward = Some(path),
            ReadDirection::Reverse => self.reverse = Some(path),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.forward.is_some() && self.reverse.is_some()
    }
}

/// Sample identifier to read slots, in order of first discovery.
pub type SampleMap = IndexMap<String, SamplePair>;

/// Result of grouping a set of files.
#[derive(Debug, Default)]
pub struct GroupedSamples {
    pub samples: SampleMap,
    /// Files that matched the suffix but had no `_R1`/`_R2` marker. Each one
    /// is also reported with `warn!` as it is skipped, and the run summary
    /// lists them again.
    pub skipped: Vec<PathBuf>,
}

/// Returns the prefix of `file_name` before the first underscore, or the
/// whole name if it has none.
pub fn sample_identifier(file_name: &str) -> &str {
    file_name.split('_').next().unwrap_or(file_name)
}

/// Classifies a file name by its read marker. `_R1` is checked first, so a
/// name carrying both markers counts as forward.
pub fn classify_read(file_name: &str) -> Option<ReadDirection> {
    if file_name.contains(FORWARD_MARKER) {
        Some(ReadDirection::Forward)
    } else if file_name.contains(REVERSE_MARKER) {
        Some(ReadDirection::Reverse)
    } else {
        None
    }
}

/// Groups already-discovered read files into samples.
///
/// A later file for the same identifier and direction overwrites the earlier
/// one; no duplicate is reported.
pub fn group_files<I>(files: I) -> GroupedSamples
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut grouped = GroupedSamples::default();

    for path in files {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };

        match classify_read(&file_name) {
            Some(direction) => {
                let identifier = sample_identifier(&file_name).to_string();
                debug!("{:?} -> sample {} ({:?})", path, identifier, direction);
                grouped
                    .samples
                    .entry(identifier)
                    .or_default()
                    .set(direction, path);
            }
            None => {
                warn!(
                    "The file {} name does not contain R1/R2, skipping it",
                    path.display()
                );
                grouped.skipped.push(path);
            }
        }
    }

    grouped
}

/// Scans `root` recursively and groups every `*.fastq.gz` file found.
pub fn create_sample_map(root: &Path) -> Result<GroupedSamples> {
    let files = find_fastq_files(root)?;
    Ok(group_files(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn test_sample_identifier() {
        assert_eq!(sample_identifier("S1_R1.fastq.gz"), "S1");
        assert_eq!(sample_identifier("ABC-12_S3_L001_R2_001.fastq.gz"), "ABC-12");
        assert_eq!(sample_identifier("noseparator.fastq.gz"), "noseparator.fastq.gz");
    }

    #[test]
    fn test_classify_read() {
        assert_eq!(classify_read("S1_R1.fastq.gz"), Some(ReadDirection::Forward));
        assert_eq!(
            classify_read("S1_L001_R2_001.fastq.gz"),
            Some(ReadDirection::Reverse)
        );
        assert_eq!(classify_read("S1_1.fastq.gz"), None);
        assert_eq!(classify_read("S1_R1_R2.fastq.gz"), Some(ReadDirection::Forward));
    }

    #[test]
    fn test_pair_is_grouped_under_one_key() {
        let dir = tempdir().unwrap();
        let r1 = touch(dir.path(), "S1_R1.fastq.gz");
        let r2 = touch(dir.path(), "S1_R2.fastq.gz");

        let grouped = create_sample_map(dir.path()).unwrap();

        assert_eq!(grouped.samples.len(), 1);
        let pair = &grouped.samples["S1"];
        assert_eq!(pair.forward.as_ref(), Some(&r1));
        assert_eq!(pair.reverse.as_ref(), Some(&r2));
        assert!(pair.is_complete());
        assert!(grouped.skipped.is_empty());
    }

    #[test]
    fn test_single_forward_read_leaves_reverse_unset() {
        let dir = tempdir().unwrap();
        let r1 = touch(dir.path(), "S2_R1.fastq.gz");

        let grouped = create_sample_map(dir.path()).unwrap();

        let pair = &grouped.samples["S2"];
        assert_eq!(pair.forward.as_ref(), Some(&r1));
        assert_eq!(pair.reverse, None);
        assert!(!pair.is_complete());
    }

    #[test]
    fn test_file_without_marker_is_skipped() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "S3_R1.fastq.gz");
        let unmarked = touch(dir.path(), "S4_reads.fastq.gz");

        let grouped = create_sample_map(dir.path()).unwrap();

        assert_eq!(grouped.samples.len(), 1);
        assert!(grouped.samples.contains_key("S3"));
        assert!(!grouped.samples.contains_key("S4"));
        assert_eq!(grouped.skipped, vec![unmarked]);
    }

    #[test]
    fn test_nested_directories_are_scanned() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("plate1");
        fs::create_dir(&sub).unwrap();
        touch(dir.path(), "S5_R1.fastq.gz");
        let r2 = touch(&sub, "S5_R2.fastq.gz");

        let grouped = create_sample_map(dir.path()).unwrap();

        assert_eq!(grouped.samples["S5"].reverse.as_ref(), Some(&r2));
    }

    #[test]
    fn test_duplicate_direction_last_write_wins() {
        let first = PathBuf::from("a/S6_R1.fastq.gz");
        let second = PathBuf::from("b/S6_L002_R1.fastq.gz");

        let grouped = group_files(vec![first, second.clone()]);

        assert_eq!(grouped.samples.len(), 1);
        assert_eq!(grouped.samples["S6"].forward.as_ref(), Some(&second));
        assert_eq!(grouped.samples["S6"].reverse, None);
    }

    #[test]
    fn test_first_seen_order_is_kept() {
        let grouped = group_files(vec![
            PathBuf::from("Z9_R2.fastq.gz"),
            PathBuf::from("A1_R1.fastq.gz"),
            PathBuf::from("Z9_R1.fastq.gz"),
        ]);

        let keys: Vec<_> = grouped.samples.keys().cloned().collect();
        assert_eq!(keys, vec!["Z9", "A1"]);
    }

    #[test]
    fn test_empty_directory_gives_empty_map() {
        let dir = tempdir().unwrap();

        let grouped = create_sample_map(dir.path()).unwrap();

        assert!(grouped.samples.is_empty());
        assert!(grouped.skipped.is_empty());
    }
}
