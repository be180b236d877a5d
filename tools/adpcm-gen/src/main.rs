//! adpcm-gen - sample table generator
//!
//! Encodes a directory of WAV samples to ADPCM and prints an embeddable
//! C header on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use adpcm_gen::{check_symbols, generate_header, select_samples, Config, ExternalEncoder};

#[derive(Parser)]
#[command(name = "adpcm-gen")]
#[command(about = "Encode a directory of WAV samples into a C header")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode all samples and print the header to stdout
    Generate {
        /// Directory containing the samples
        dir: PathBuf,

        #[command(flatten)]
        options: GenerateOptions,
    },

    /// Check that an existing header matches a fresh generation
    Check {
        /// Directory containing the samples
        dir: PathBuf,

        /// Previously generated header
        header: PathBuf,

        #[command(flatten)]
        options: GenerateOptions,
    },

    /// List the selected samples and their symbol names
    List {
        /// Directory containing the samples
        dir: PathBuf,

        /// Config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateOptions {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Encoder executable (overrides config)
    #[arg(short, long)]
    encoder: Option<String>,

    /// Encoder argument, repeatable (replaces the configured list)
    #[arg(long = "encoder-arg", allow_hyphen_values = true)]
    encoder_args: Vec<String>,

    /// Maximum line width of array bodies (overrides config)
    #[arg(long)]
    line_width: Option<usize>,

    /// Check every payload is a loadable IMA ADPCM WAV
    #[arg(long)]
    verify: bool,
}

impl GenerateOptions {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = load_config(self.config.as_deref())?;

        if let Some(program) = &self.encoder {
            config.encoder.program = program.clone();
        }
        if !self.encoder_args.is_empty() {
            config.encoder.args = self.encoder_args.clone();
        }
        if let Some(width) = self.line_width {
            config.output.line_width = width;
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load(path).with_context(|| format!("Loading config {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

fn render(dir: &Path, options: &GenerateOptions) -> Result<String> {
    let config = options.resolve_config()?;
    let encoder = ExternalEncoder::resolve(&config.encoder)?;
    generate_header(dir, &config, &encoder, options.verify)
        .with_context(|| format!("Generating header for {}", dir.display()))
}

fn main() -> Result<()> {
    // Stdout carries the header, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { dir, options } => {
            let header = render(&dir, &options)?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(header.as_bytes())
                .context("Writing header to stdout")?;
            stdout.flush()?;
        }

        Commands::Check {
            dir,
            header,
            options,
        } => {
            let expected = render(&dir, &options)?;
            let existing = std::fs::read_to_string(&header)
                .with_context(|| format!("Reading {}", header.display()))?;

            if existing == expected {
                println!("✓ {} is in sync", header.display());
            } else {
                println!("✗ {} is out of sync", header.display());
                anyhow::bail!(
                    "Header is out of sync. Run 'adpcm-gen generate {}' to regenerate.",
                    dir.display()
                );
            }
        }

        Commands::List { dir, config } => {
            let config = load_config(config.as_deref())?;
            let samples = select_samples(&dir, config.extension())
                .with_context(|| format!("Scanning {}", dir.display()))?;
            check_symbols(&samples, &config.output)?;

            for sample in &samples {
                println!(
                    "{}\t{}",
                    config.output.enum_symbol(&sample.name),
                    sample.path.display()
                );
            }
            tracing::info!("{} sample(s)", samples.len());
        }
    }

    Ok(())
}
