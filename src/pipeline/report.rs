use super::processor::TemplateSummary;

/// Renders a short human-readable summary of a template run.
pub fn generate_report(summary: &TemplateSummary) -> String {
    let mut report = String::new();

    if summary.samples_written == 0 {
        report.push_str(&format!(
            "No samples found, {} was not written.\n",
            summary.output.display()
        ));
    } else {
        report.push_str(&format!(
            "Wrote {} sample(s) to {}\n",
            summary.samples_written,
            summary.output.display()
        ));
        report.push_str(&format!(
            "  paired: {}, single read: {}\n",
            summary.complete_pairs,
            summary.samples_written - summary.complete_pairs
        ));
        if summary.header_existed {
            report.push_str("  previous template content was replaced\n");
        }
    }

    // Files left out of the template
    if !summary.skipped_files.is_empty() {
        report.push_str(&format!(
            "Skipped {} file(s) without an R1/R2 marker:\n",
            summary.skipped_files.len()
        ));
        for path in &summary.skipped_files {
            report.push_str(&format!("  {}\n", path.display()));
        }
    }

    report
}
