use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn};
use std::path::PathBuf;

use crate::config::TemplateConfig;
use crate::pipeline::{generate_report, generate_template, PlaceholderFields, SampleFieldSource};
use crate::prompt::Prompter;

/// Builds a pipeline metadata template from paired FASTQ files.
///
/// Values not given as flags or in the config file are asked interactively,
/// each with a default that an empty answer accepts.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Species written to #Pipeline-Species
    #[arg(long)]
    pub species: Option<String>,

    /// Organization written to Owner-Collection
    #[arg(long)]
    pub owner: Option<String>,

    /// Location (case sensitive)
    #[arg(long)]
    pub location: Option<String>,

    /// Add results to DB (y/n)
    #[arg(long)]
    pub add_results: Option<String>,

    /// Directory scanned recursively for *.fastq.gz files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Template file to write [default: metadata.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with default values; flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Never prompt, use defaults for anything not supplied
    #[arg(long)]
    pub non_interactive: bool,

    /// Ask source and dates for every sample instead of using placeholders
    #[arg(long)]
    pub per_sample: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Settings given directly on the command line.
    pub fn flag_config(&self) -> TemplateConfig {
        TemplateConfig {
            species: self.species.clone(),
            owner: self.owner.clone(),
            location: self.location.clone(),
            add_results: self.add_results.clone(),
            input_dir: self.input.clone(),
            output: self.output.clone(),
            ..Default::default()
        }
    }

    /// Flag settings layered over the config file, if one was given.
    pub fn template_config(&self) -> Result<TemplateConfig> {
        let flags = self.flag_config();
        match &self.config {
            Some(path) => {
                let from_file = TemplateConfig::from_file(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?;
                info!("Loaded config from {}", path.display());
                Ok(flags.or(from_file))
            }
            None => Ok(flags),
        }
    }
}

/// Main entry point for CLI
pub fn run_cli(cli: Cli) -> Result<()> {
    let config = cli.template_config()?;

    let mut prompter = if cli.non_interactive {
        None
    } else {
        Some(Prompter::stdio())
    };

    let globals = config.resolve_globals(prompter.as_mut())?;
    let input_dir = config.resolve_input_dir(prompter.as_mut())?;
    let output = config.output_path();
    info!("Global metadata: {:?}", globals);

    let mut placeholders = PlaceholderFields(config.sample_placeholders());
    let fields: &mut dyn SampleFieldSource = match prompter.as_mut() {
        Some(p) if cli.per_sample => p as &mut dyn SampleFieldSource,
        _ => {
            if cli.per_sample {
                warn!("--per-sample ignored in non-interactive mode, using placeholders");
            }
            &mut placeholders
        }
    };

    let summary = generate_template(&globals, &input_dir, &output, fields)?;
    print!("{}", generate_report(&summary));
    Ok(())
}
