pub mod check;
pub mod convert;
pub mod scan;

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::codec::Format;
use crate::config::DistribConfig;
use crate::distrib::Distribution;

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory of track archives and build a distribution
    Scan {
        /// Directory with .szs, .wbz or .lex files
        dir: PathBuf,

        /// Distribution config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Existing distribution to merge the archives into
        #[arg(short, long)]
        base: Option<PathBuf>,

        /// Output format: json, tracks, sha1, cups
        #[arg(short, long, default_value = "tracks")]
        format: Format,

        /// Output file (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Convert a distribution between formats
    Convert {
        /// Input distribution
        input: PathBuf,

        /// Input format (detected from the extension if not specified)
        #[arg(long)]
        from: Option<Format>,

        /// Output format: json, tracks, sha1, cups
        #[arg(long)]
        to: Format,

        /// Distribution config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a distribution and print statistics
    Check {
        /// Input distribution
        input: PathBuf,

        /// Input format (detected from the extension if not specified)
        #[arg(long)]
        from: Option<Format>,

        /// Distribution config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Scan {
                dir,
                config,
                base,
                format,
                output,
                quiet,
            } => scan::execute(
                dir,
                config.as_deref(),
                base.as_deref(),
                *format,
                output.as_deref(),
                *quiet,
            ),
            Commands::Convert {
                input,
                from,
                to,
                config,
                output,
            } => convert::execute(input, *from, *to, config.as_deref(), output.as_deref()),
            Commands::Check {
                input,
                from,
                config,
            } => check::execute(input, *from, config.as_deref()),
        }
    }
}

/// Create a distribution from an optional config file
fn new_distribution(config: Option<&Path>) -> anyhow::Result<Distribution> {
    let config = match config {
        Some(path) => DistribConfig::load(path)?,
        None => DistribConfig::default(),
    };
    Ok(Distribution::new(config))
}

/// Read a distribution file into `distrib`
fn load_into(distrib: &mut Distribution, input: &Path, from: Option<Format>) -> anyhow::Result<usize> {
    let format = from.unwrap_or_else(|| Format::from_path(input));
    let data = std::fs::read(input)?;
    let count = format.import(distrib, &data)?;
    tracing::info!("Loaded {} tracks from {} ({})", count, input.display(), format);
    Ok(count)
}

/// Write serialized output to a file or stdout
fn write_output(data: &[u8], output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, data)?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            use std::io::Write;
            std::io::stdout().write_all(data)?;
        }
    }
    Ok(())
}
