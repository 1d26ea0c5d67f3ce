use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{GlobalMetadata, SampleFields};
use crate::metadata::{header_exists, write_metadata, MetadataRecord};
use crate::prompt::Prompter;
use crate::samples::create_sample_map;

/// Supplies the per-sample columns (source and dates) of a row.
pub trait SampleFieldSource {
    fn sample_fields(&mut self, sample_id: &str) -> io::Result<SampleFields>;
}

/// Uses the same placeholder values for every sample.
#[derive(Debug, Clone)]
pub struct PlaceholderFields(pub SampleFields);

impl SampleFieldSource for PlaceholderFields {
    fn sample_fields(&mut self, _sample_id: &str) -> io::Result<SampleFields> {
        Ok(self.0.clone())
    }
}

impl<R: BufRead, W: Write> SampleFieldSource for Prompter<R, W> {
    fn sample_fields(&mut self, sample_id: &str) -> io::Result<SampleFields> {
        self.ask_sample_fields(sample_id)
    }
}

/// Outcome of one template run.
#[derive(Debug, Clone, Default)]
pub struct TemplateSummary {
    pub output: PathBuf,
    pub samples_written: usize,
    /// Samples with both reads present.
    pub complete_pairs: usize,
    pub skipped_files: Vec<PathBuf>,
    /// Whether `output` already held a template before the run.
    pub header_existed: bool,
}

/// Scans `input_dir`, builds one row per sample and writes the template to
/// `output`.
///
/// The whole row set is rewritten after each sample is added, so the file
/// always holds a complete template. Nothing is written when no sample is
/// found.
pub fn generate_template<S: SampleFieldSource + ?Sized>(
    globals: &GlobalMetadata,
    input_dir: &Path,
    output: &Path,
    fields: &mut S,
) -> Result<TemplateSummary> {
    let header_existed = header_exists(output)
        .with_context(|| format!("Failed to inspect {}", output.display()))?;
    if header_existed {
        info!(
            "Existing template found at {}, it will be rewritten",
            output.display()
        );
    }

    let grouped = create_sample_map(input_dir)
        .with_context(|| format!("Failed to group samples in {}", input_dir.display()))?;
    info!(
        "Grouped {} sample(s), skipped {} file(s)",
        grouped.samples.len(),
        grouped.skipped.len()
    );

    let mut records = Vec::with_capacity(grouped.samples.len());
    let mut complete_pairs = 0;
    for (sample_id, pair) in &grouped.samples {
        let sample_fields = fields
            .sample_fields(sample_id)
            .with_context(|| format!("Failed to read metadata for sample {}", sample_id))?;
        if pair.is_complete() {
            complete_pairs += 1;
        }

        records.push(MetadataRecord::new(globals, sample_id, pair, sample_fields));
        write_metadata(output, &records)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        debug!("Wrote {} row(s) to {:?}", records.len(), output);
    }

    Ok(TemplateSummary {
        output: output.to_path_buf(),
        samples_written: records.len(),
        complete_pairs,
        skipped_files: grouped.skipped,
        header_existed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateConfig;
    use crate::metadata::read_metadata;
    use std::fs::{self, File};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn globals() -> GlobalMetadata {
        GlobalMetadata {
            species: "Campylobacter jejuni".to_string(),
            owner: "THL".to_string(),
            location: "Finland".to_string(),
            add_results: "n".to_string(),
        }
    }

    fn placeholders() -> PlaceholderFields {
        PlaceholderFields(TemplateConfig::default().sample_placeholders())
    }

    #[test]
    fn test_generate_template_end_to_end() {
        let dir = tempdir().unwrap();
        let reads = dir.path().join("reads");
        fs::create_dir(&reads).unwrap();
        for name in [
            "S1_R1.fastq.gz",
            "S1_R2.fastq.gz",
            "S2_R1.fastq.gz",
            "S3.fastq.gz",
            "README.md",
        ] {
            File::create(reads.join(name)).unwrap();
        }
        let output = dir.path().join("metadata.csv");

        let summary =
            generate_template(&globals(), &reads, &output, &mut placeholders()).unwrap();

        assert_eq!(summary.samples_written, 2);
        assert_eq!(summary.complete_pairs, 1);
        assert_eq!(summary.skipped_files, vec![reads.join("S3.fastq.gz")]);
        assert!(!summary.header_existed);
        let report = crate::pipeline::generate_report(&summary);
        assert!(report.contains(&reads.join("S3.fastq.gz").display().to_string()));

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(header_exists(&output).unwrap());

        let rows = read_metadata(&output).unwrap();
        assert_eq!(rows[0].identifier, "S1");
        assert_eq!(rows[0].file1, reads.join("S1_R1.fastq.gz").display().to_string());
        assert_eq!(rows[0].file2, reads.join("S1_R2.fastq.gz").display().to_string());
        assert_eq!(rows[1].identifier, "S2");
        assert_eq!(rows[1].file2, "");
        assert!(rows.iter().all(|r| r.species == "Campylobacter jejuni"));
        assert!(rows.iter().all(|r| r.add_results == "n"));
        assert!(rows.iter().all(|r| r.sampling_date == "2024-04-02"));
    }

    #[test]
    fn test_empty_directory_writes_nothing() {
        let dir = tempdir().unwrap();
        let reads = dir.path().join("reads");
        fs::create_dir(&reads).unwrap();
        let output = dir.path().join("metadata.csv");

        let summary =
            generate_template(&globals(), &reads, &output, &mut placeholders()).unwrap();

        assert_eq!(summary.samples_written, 0);
        assert!(!output.exists());
    }

    #[test]
    fn test_existing_template_is_detected_and_rewritten() {
        let dir = tempdir().unwrap();
        let reads = dir.path().join("reads");
        fs::create_dir(&reads).unwrap();
        File::create(reads.join("S7_R2.fastq.gz")).unwrap();
        let output = dir.path().join("metadata.csv");
        write_metadata(&output, &[MetadataRecord::default(), MetadataRecord::default()])
            .unwrap();

        let summary =
            generate_template(&globals(), &reads, &output, &mut placeholders()).unwrap();

        assert!(summary.header_existed);
        let rows = read_metadata(&output).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].identifier, "S7");
    }

    #[test]
    fn test_non_utf8_output_is_rewritten() {
        let dir = tempdir().unwrap();
        let reads = dir.path().join("reads");
        fs::create_dir(&reads).unwrap();
        File::create(reads.join("S8_R1.fastq.gz")).unwrap();
        let output = dir.path().join("metadata.csv");
        fs::write(&output, b"Sample;Location;Sijainti \xe4\n").unwrap();

        let summary =
            generate_template(&globals(), &reads, &output, &mut placeholders()).unwrap();

        assert!(!summary.header_existed);
        let rows = read_metadata(&output).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].identifier, "S8");
    }

    #[test]
    fn test_per_sample_prompting() {
        let dir = tempdir().unwrap();
        let reads = dir.path().join("reads");
        fs::create_dir(&reads).unwrap();
        File::create(reads.join("S1_R1.fastq.gz")).unwrap();
        File::create(reads.join("S2_R1.fastq.gz")).unwrap();
        let output = dir.path().join("metadata.csv");
        let answers = "Food\n2024-01-15\n\n\n\n2024-02-01\n";
        let mut prompter = Prompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new());

        generate_template(&globals(), &reads, &output, &mut prompter).unwrap();

        let rows = read_metadata(&output).unwrap();
        assert_eq!(rows[0].source, "Food");
        assert_eq!(rows[0].sampling_date, "2024-01-15");
        assert_eq!(rows[0].sample_received_date, "");
        assert_eq!(rows[1].source, "Human");
        assert_eq!(rows[1].sampling_date, "");
        assert_eq!(rows[1].sample_received_date, "2024-02-01");
    }

    #[test]
    fn test_missing_input_directory_fails() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("metadata.csv");

        let result = generate_template(
            &globals(),
            &dir.path().join("absent"),
            &output,
            &mut placeholders(),
        );

        assert!(result.is_err());
        assert!(!output.exists());
    }
}
