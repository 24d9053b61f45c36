mod config;
mod input;
mod output;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use config::{Cli, Config, Mode, Verbosity};
use huffarc_core::format::FileEntry;
use huffarc_core::{compress, extract, list};
use tracing::{info, warn};

fn init_tracing(verbosity: Verbosity) {
    // --quiet: nothing, --verbose: RUST_LOG or info, default: warnings only
    let filter = match verbosity {
        Verbosity::Quiet => tracing_subscriber::EnvFilter::new("off"),
        Verbosity::Verbose => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into()),
        Verbosity::Normal => tracing_subscriber::EnvFilter::new("warn"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let config = Config::from_cli(Cli::parse());
    init_tracing(config.verbosity);

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> huffarc_core::Result<()> {
    match &config.mode {
        Mode::Compress { inputs } => run_compress(config, inputs),
        Mode::List => run_list(&config.archive),
        Mode::Extract { out_dir } => run_extract(config, out_dir.as_deref()),
    }
}

fn run_compress(config: &Config, paths: &[std::path::PathBuf]) -> huffarc_core::Result<()> {
    let inputs = input::collect_inputs(paths)?;
    for skipped in &inputs.skipped {
        warn!(path = %skipped.path.display(), "skipped input: {}", skipped.reason);
    }

    let report = output::write_atomically(&config.archive, |out| compress(&inputs.files, out))?;

    info!(archive = %config.archive.display(), files = report.files, "archive written");
    if config.verbosity == Verbosity::Verbose {
        report.print_summary();
    }
    Ok(())
}

fn run_list(archive: &Path) -> huffarc_core::Result<()> {
    let entries = list(BufReader::new(File::open(archive)?))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(output::format_listing(&entries).as_bytes())?;
    handle.flush()?;
    Ok(())
}

fn run_extract(config: &Config, out_dir: Option<&Path>) -> huffarc_core::Result<()> {
    let reader = BufReader::new(File::open(&config.archive)?);
    let report = extract(reader, |entry: &FileEntry, bytes: &[u8]| {
        output::write_entry(out_dir, &entry.name, bytes).map(|_| ())
    })?;

    if config.verbosity == Verbosity::Verbose {
        report.print_summary();
    }
    Ok(())
}
