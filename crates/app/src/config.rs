//! Configuration for the huffarc command-line tool.
//!
//! Arguments are parsed with clap into [`Cli`], then resolved into a
//! [`Config`] that the rest of the binary works from. `--print-config`
//! echoes the resolved configuration before the command runs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "huffarc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Huffman archiver: compress, list and extract multi-file archives")]
#[command(long_about = "huffarc - Huffman archiver\n\n\
    Compresses one or more files into a single archive with a shared Huffman code,\n\
    lists the archived files, or extracts them with checksum verification.\n\n\
    Examples:\n\
      huffarc compress docs.huff README.md notes.txt\n\
      huffarc list docs.huff\n\
      huffarc extract docs.huff ./restored")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show progress and summaries (honours RUST_LOG)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print the resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress files into a new archive
    Compress {
        /// Archive to create (overwritten if it exists)
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Files to add; unreadable files and duplicate names are skipped
        #[arg(value_name = "FILES", required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// List archived files sorted by name
    List {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
    },

    /// Extract every file, skipping entries that fail verification
    Extract {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Destination folder (default: current directory)
        #[arg(value_name = "OUT_DIR")]
        out_dir: Option<PathBuf>,
    },
}

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Compress { inputs: Vec<PathBuf> },
    List,
    Extract { out_dir: Option<PathBuf> },
}

/// Log verbosity requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Archive to create or read
    pub archive: PathBuf,

    pub mode: Mode,

    pub verbosity: Verbosity,

    /// Whether to print the resolved configuration
    pub print_config: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    pub fn from_cli(cli: Cli) -> Self {
        let verbosity = if cli.quiet {
            Verbosity::Quiet
        } else if cli.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        let (archive, mode) = match cli.command {
            Commands::Compress { archive, files } => (archive, Mode::Compress { inputs: files }),
            Commands::List { archive } => (archive, Mode::List),
            Commands::Extract { archive, out_dir } => (archive, Mode::Extract { out_dir }),
        };

        Self {
            archive,
            mode,
            verbosity,
            print_config: cli.print_config,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Archive: {}", self.archive.display());
        match &self.mode {
            Mode::Compress { inputs } => {
                println!("Mode: compress");
                println!("Inputs: {}", inputs.len());
                for input in inputs {
                    println!("  {}", input.display());
                }
            }
            Mode::List => println!("Mode: list"),
            Mode::Extract { out_dir } => {
                println!("Mode: extract");
                println!(
                    "Output folder: {}",
                    out_dir
                        .as_ref()
                        .map_or_else(|| "(current directory)".to_string(), |p| p.display().to_string())
                );
            }
        }
        println!("Verbosity: {:?}", self.verbosity);
        println!();
    }
}
