//! Metadata template generator for paired-end sequencing runs.
//!
//! Read files (`*.fastq.gz`) found under a directory are grouped into samples
//! by the file-name prefix before the first underscore and their `_R1`/`_R2`
//! marker. One semicolon-delimited row per sample is written to a template
//! that a downstream pipeline consumes, pre-filled with run-wide values.

pub mod cli;
pub mod config;
pub mod io;
pub mod metadata;
pub mod pipeline;
pub mod prompt;
pub mod samples;
