//! Interactive prompting with literal defaults.

use std::io::{self, BufRead, Write};

use crate::config::{SampleFields, DEFAULT_SOURCE};

/// Line-oriented prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the process terminal.
    pub fn stdio() -> Self {
        Prompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Prompter { reader, writer }
    }

    /// Consumes the prompter and hands back the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Reads one line after showing `prompt`, without the line terminator.
    /// End of input reads as an empty line.
    pub fn ask_raw(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Shows `<prompt> [<default>]: ` and returns the answer, or `default`
    /// when the answer is blank.
    pub fn ask(&mut self, prompt: &str, default: &str) -> io::Result<String> {
        let answer = self.ask_raw(&format!("{} [{}]: ", prompt, default))?;
        if answer.trim().is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Asks for the per-sample fields of `sample_id`.
    ///
    /// The received date is optional once a sampling date is given.
    pub fn ask_sample_fields(&mut self, sample_id: &str) -> io::Result<SampleFields> {
        writeln!(self.writer, "\nMetadata for sample {}:", sample_id)?;
        let source = self.ask("Enter Source (e.g., Human)", DEFAULT_SOURCE)?;
        let sampling_date = self.ask_raw("Enter Sampling-Date (YYYY-MM-DD): ")?;
        let sample_received_date = if sampling_date.is_empty() {
            self.ask_raw("Enter Sample-Received-Date (YYYY-MM-DD): ")?
        } else {
            self.ask_raw("Enter Sample-Received-Date (optional, press Enter to skip): ")?
        };

        Ok(SampleFields {
            source,
            sampling_date,
            sample_received_date,
        })
    }
}
