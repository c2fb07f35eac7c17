//! legacy-config - config entry inspection tool
//!
//! Decodes `.dat` config entries (items, NPCs, map objects, varps,
//! identikits, sequences), dumps them, and writes canonical re-encodings.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use config_cli::config::{self, OutputFormat, ToolConfig};
use config_cli::dump::{DumpOptions, dump};
use config_cli::input::{EntryFiles, load_definitions};
use config_cli::reencode::reencode;
use config_cli::{Kind, with_kind};
use legacy_config::DefinitionKind;

#[derive(Parser)]
#[command(name = "legacy-config")]
#[command(about = "Legacy cache config entry tool")]
#[command(version)]
struct Cli {
    /// Config file (default: legacy-config.toml in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the definitions of an entry
    Dump {
        /// Definition kind
        #[arg(value_enum)]
        kind: Kind,

        /// Input .dat file
        dat: PathBuf,

        /// Matching .idx file
        #[arg(long)]
        index: Option<PathBuf>,

        /// Only print this definition
        #[arg(long)]
        id: Option<u32>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Decode every definition of an entry and report the count
    Check {
        /// Definition kind
        #[arg(value_enum)]
        kind: Kind,

        /// Input .dat file
        dat: PathBuf,

        /// Matching .idx file
        #[arg(long)]
        index: Option<PathBuf>,
    },

    /// Decode an entry and write its canonical encoding
    Reencode {
        /// Definition kind
        #[arg(value_enum)]
        kind: Kind,

        /// Input .dat file
        dat: PathBuf,

        /// Matching .idx file
        #[arg(long)]
        index: Option<PathBuf>,

        /// Output .dat file
        #[arg(short, long)]
        output: PathBuf,

        /// Output .idx file
        #[arg(long)]
        index_out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let tool_config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };

    match cli.command {
        Commands::Dump {
            kind,
            dat,
            index,
            id,
            format,
        } => {
            let files = EntryFiles::new(dat, index);
            let options = DumpOptions {
                format: format.unwrap_or(tool_config.output.format),
                pretty: tool_config.output.pretty,
                id,
            };
            with_kind!(kind, run_dump(&files, &tool_config, options))?;
        }

        Commands::Check { kind, dat, index } => {
            let files = EntryFiles::new(dat, index);
            let count = with_kind!(kind, run_check(&files, &tool_config))?;
            tracing::info!(
                "{} {} definitions decoded from {:?}",
                count,
                kind.entry_name(),
                files.dat
            );
        }

        Commands::Reencode {
            kind,
            dat,
            index,
            output,
            index_out,
        } => {
            let files = EntryFiles::new(dat, index);
            tracing::info!("Re-encoding {:?} -> {:?}", files.dat, output);
            with_kind!(
                kind,
                run_reencode(&files, &tool_config, &output, index_out.as_deref())
            )?;
            tracing::info!("Done!");
        }
    }

    Ok(())
}

fn run_dump<K: DefinitionKind>(
    files: &EntryFiles,
    config: &ToolConfig,
    options: DumpOptions,
) -> Result<()> {
    let definitions = load_definitions::<K>(files, config.decode.parallel)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dump(&definitions, options, &mut out)?;
    out.flush().context("Failed to flush output")
}

fn run_check<K: DefinitionKind>(files: &EntryFiles, config: &ToolConfig) -> Result<usize> {
    Ok(load_definitions::<K>(files, config.decode.parallel)?.len())
}

fn run_reencode<K: DefinitionKind>(
    files: &EntryFiles,
    config: &ToolConfig,
    output: &Path,
    index_out: Option<&Path>,
) -> Result<()> {
    let definitions = load_definitions::<K>(files, config.decode.parallel)?;
    reencode(&definitions, output, index_out, config.decode.verify_reencode)?;
    Ok(())
}
