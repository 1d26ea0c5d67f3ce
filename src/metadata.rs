//! Metadata template handling module.
//!
//! This module defines the fixed 18-column template row and the functions
//! that write it to, and read it back from, the semicolon-delimited file
//! consumed by the downstream pipeline.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

use crate::config::{GlobalMetadata, SampleFields};
use crate::samples::SamplePair;

/// Column names of the template, in output order.
pub const HEADER: [&str; 18] = [
    "#Pipeline-Species",
    "Primary-Identifier",
    "RYMY-ID",
    "Food_bug",
    "Source",
    "Sampling-Reason",
    "Sampling-Date",
    "Sample-Received-Date",
    "Owner-Collection",
    "Location",
    "AMR-Phenotype",
    "Additional-Information",
    "File_1",
    "File_2",
    "Instrument",
    "Library",
    "Library-Other",
    "Add-Results",
];

/// Prefix the first line of a template file starts with.
pub const HEADER_PREFIX: &str = "#Pipeline-Species;";

pub const DELIMITER: u8 = b';';

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// One row of the template. Field order matches [`HEADER`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(rename = "#Pipeline-Species")]
    pub species: String,
    #[serde(rename = "Primary-Identifier")]
    pub identifier: String,
    #[serde(rename = "RYMY-ID")]
    pub rymy_id: String,
    #[serde(rename = "Food_bug")]
    pub food_bug: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Sampling-Reason")]
    pub sampling_reason: String,
    #[serde(rename = "Sampling-Date")]
    pub sampling_date: String,
    #[serde(rename = "Sample-Received-Date")]
    pub sample_received_date: String,
    #[serde(rename = "Owner-Collection")]
    pub owner: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "AMR-Phenotype")]
    pub amr_phenotype: String,
    #[serde(rename = "Additional-Information")]
    pub additional_information: String,
    #[serde(rename = "File_1")]
    pub file1: String,
    #[serde(rename = "File_2")]
    pub file2: String,
    #[serde(rename = "Instrument")]
    pub instrument: String,
    #[serde(rename = "Library")]
    pub library: String,
    #[serde(rename = "Library-Other")]
    pub library_other: String,
    #[serde(rename = "Add-Results")]
    pub add_results: String,
}

impl MetadataRecord {
    /// Builds the row for one sample. Columns with no source value are left
    /// blank for the submitter to fill in; a missing read file is written as
    /// an empty value.
    pub fn new(
        globals: &GlobalMetadata,
        sample_id: &str,
        pair: &SamplePair,
        fields: SampleFields,
    ) -> Self {
        let path_value = |p: &Option<std::path::PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        MetadataRecord {
            species: globals.species.clone(),
            identifier: sample_id.to_string(),
            source: fields.source,
            sampling_date: fields.sampling_date,
            sample_received_date: fields.sample_received_date,
            owner: globals.owner.clone(),
            location: globals.location.clone(),
            file1: path_value(&pair.forward),
            file2: path_value(&pair.reverse),
            add_results: globals.add_results.clone(),
            ..Default::default()
        }
    }
}

/// Checks whether `path` already holds a template, by looking only at its
/// first line. A missing file is not an error.
pub fn header_exists(path: &Path) -> Result<bool, MetadataError> {
    if !path.is_file() {
        return Ok(false);
    }
    // Read raw bytes: a file saved in a non-UTF-8 encoding is simply not a template.
    let mut first_line = Vec::new();
    BufReader::new(File::open(path)?).read_until(b'\n', &mut first_line)?;
    Ok(String::from_utf8_lossy(&first_line)
        .trim()
        .starts_with(HEADER_PREFIX))
}

/// Writes the header followed by every record to `path`, replacing whatever
/// the file held before.
pub fn write_metadata(path: &Path, records: &[MetadataRecord]) -> Result<(), MetadataError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::CRLF)
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?; // Ensure all data is written to the file
    Ok(())
}

/// Reads a template written by [`write_metadata`], skipping the header.
pub fn read_metadata(path: &Path) -> Result<Vec<MetadataRecord>, MetadataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<MetadataRecord>() {
        records.push(result?);
    }
    Ok(records)
}
