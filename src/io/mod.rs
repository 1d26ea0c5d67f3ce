//! Input/Output operations module.
//!
//! Handles locating sequencing read files on disk. Writing the template
//! itself lives in [`crate::metadata`].

pub mod fastq; // Sub-module specifically for FASTQ discovery

pub use fastq::{find_fastq_files, is_fastq_gz, FASTQ_SUFFIX};
