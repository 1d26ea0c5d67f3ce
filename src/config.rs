//! Run configuration.
//!
//! Global template values can come from command-line flags, a JSON config
//! file, or interactive prompts. Every field is optional at load time and is
//! resolved once into [`GlobalMetadata`], falling back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::prompt::Prompter;

pub const DEFAULT_SPECIES: &str = "Escherichia coli";
pub const DEFAULT_OWNER: &str = "THL";
pub const DEFAULT_LOCATION: &str = "Finland";
pub const DEFAULT_ADD_RESULTS: &str = "y";
pub const DEFAULT_INPUT_DIR: &str = ".";
pub const DEFAULT_OUTPUT: &str = "metadata.csv";

// Placeholders written for every sample unless per-sample prompting is on.
pub const DEFAULT_SOURCE: &str = "Human";
pub const DEFAULT_SAMPLING_DATE: &str = "2024-04-02";
pub const DEFAULT_SAMPLE_RECEIVED_DATE: &str = "";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid config file {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Optional settings as loaded from flags or a config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub species: Option<String>,
    pub owner: Option<String>,
    pub location: Option<String>,
    pub add_results: Option<String>,
    pub input_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub source: Option<String>,
    pub sampling_date: Option<String>,
    pub sample_received_date: Option<String>,
}

/// Values shared by every row of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalMetadata {
    pub species: String,
    pub owner: String,
    pub location: String,
    /// Lowercased yes/no answer.
    pub add_results: String,
}

/// Values that may differ per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFields {
    pub source: String,
    pub sampling_date: String,
    pub sample_received_date: String,
}

impl Default for SampleFields {
    fn default() -> Self {
        SampleFields {
            source: DEFAULT_SOURCE.to_string(),
            sampling_date: DEFAULT_SAMPLING_DATE.to_string(),
            sample_received_date: DEFAULT_SAMPLE_RECEIVED_DATE.to_string(),
        }
    }
}

impl TemplateConfig {
    /// Loads a JSON config file. Unknown keys are rejected.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fills every unset field of `self` from `fallback`. Values already set
    /// in `self` win.
    pub fn or(self, fallback: TemplateConfig) -> TemplateConfig {
        TemplateConfig {
            species: self.species.or(fallback.species),
            owner: self.owner.or(fallback.owner),
            location: self.location.or(fallback.location),
            add_results: self.add_results.or(fallback.add_results),
            input_dir: self.input_dir.or(fallback.input_dir),
            output: self.output.or(fallback.output),
            source: self.source.or(fallback.source),
            sampling_date: self.sampling_date.or(fallback.sampling_date),
            sample_received_date: self.sample_received_date.or(fallback.sample_received_date),
        }
    }

    /// Resolves the global values, asking through `prompter` for anything not
    /// already set. Without a prompter the defaults are used.
    pub fn resolve_globals<R: BufRead, W: Write>(
        &self,
        mut prompter: Option<&mut Prompter<R, W>>,
    ) -> io::Result<GlobalMetadata> {
        let species = resolve(
            &self.species,
            prompter.as_deref_mut(),
            "Enter #Pipeline-Species",
            DEFAULT_SPECIES,
        )?;
        let owner = resolve(
            &self.owner,
            prompter.as_deref_mut(),
            "Enter Owner-Collection (your organization)",
            DEFAULT_OWNER,
        )?;
        let location = resolve(
            &self.location,
            prompter.as_deref_mut(),
            "Enter Location (e.g., Finland) this is case sensitive",
            DEFAULT_LOCATION,
        )?;
        let add_results = resolve(
            &self.add_results,
            prompter.as_deref_mut(),
            "Add Results to DB? (y/n)",
            DEFAULT_ADD_RESULTS,
        )?
        .to_lowercase();

        Ok(GlobalMetadata {
            species,
            owner,
            location,
            add_results,
        })
    }

    /// Resolves the directory to scan, prompting if it was not supplied.
    pub fn resolve_input_dir<R: BufRead, W: Write>(
        &self,
        prompter: Option<&mut Prompter<R, W>>,
    ) -> io::Result<PathBuf> {
        if let Some(dir) = &self.input_dir {
            return Ok(dir.clone());
        }
        match prompter {
            Some(p) => Ok(PathBuf::from(p.ask(
                "Give the path to sample fastq files folder",
                DEFAULT_INPUT_DIR,
            )?)),
            None => Ok(PathBuf::from(DEFAULT_INPUT_DIR)),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Per-sample placeholder values with config overrides applied.
    pub fn sample_placeholders(&self) -> SampleFields {
        let defaults = SampleFields::default();
        SampleFields {
            source: self.source.clone().unwrap_or(defaults.source),
            sampling_date: self.sampling_date.clone().unwrap_or(defaults.sampling_date),
            sample_received_date: self
                .sample_received_date
                .clone()
                .unwrap_or(defaults.sample_received_date),
        }
    }
}

fn resolve<R: BufRead, W: Write>(
    value: &Option<String>,
    prompter: Option<&mut Prompter<R, W>>,
    prompt: &str,
    default: &str,
) -> io::Result<String> {
    match (value, prompter) {
        (Some(v), _) => Ok(v.clone()),
        (None, Some(p)) => p.ask(prompt, default),
        (None, None) => Ok(default.to_string()),
    }
}
