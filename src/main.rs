//! EACV command-line interface
//!
//! Runs one inventory module over a CSV activity table and writes the
//! augmented table and its totals.
//!
//! # Usage
//!
//! ```bash
//! eacv --module fuels --input combustiveis.csv \
//!   --reference-dir data/lca \
//!   --output combustiveis_emissoes.csv \
//!   --summary totais.json
//! ```

use clap::Parser;
use eacv::eacv_core::errors::{EacvError, EacvResult};
use eacv::eacv_core::summary::Summary;
use eacv::{run_file, Config, ModuleKind};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Steel-industry greenhouse-gas inventory calculator
#[derive(Parser, Debug)]
#[command(name = "eacv")]
#[command(about = "Augment an activity table with greenhouse-gas emissions")]
struct Args {
    /// Inventory module to run
    #[arg(short, long, value_enum)]
    module: ModuleKind,

    /// Activity table (CSV)
    #[arg(short, long)]
    input: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the reference tables, overrides the configuration
    #[arg(long)]
    reference_dir: Option<PathBuf>,

    /// Augmented table (CSV), stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Totals, as JSON for a `.json` path and CSV otherwise
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn create(path: &Path) -> EacvResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| EacvError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("json"))
}

fn write_summary(summary: &Summary, path: &Path) -> EacvResult<()> {
    if is_json(path) {
        let json = serde_json::to_string_pretty(summary)
            .map_err(|e| EacvError::Error(format!("Failed to serialise summary: {e}")))?;
        let mut writer = create(path)?;
        writeln!(writer, "{json}")
            .and_then(|_| writer.flush())
            .map_err(|source| EacvError::Io {
                path: path.to_path_buf(),
                source,
            })
    } else {
        summary.to_table().write_csv(create(path)?)
    }
}

fn run(args: &Args) -> EacvResult<()> {
    let mut config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if let Some(directory) = &args.reference_dir {
        config.reference.directory = directory.clone();
    }

    let report = run_file(args.module, &args.input, &config)?;

    match &args.output {
        Some(path) => report.table.write_csv(create(path)?)?,
        None => report.table.write_csv(io::stdout().lock())?,
    }
    if let Some(path) = &args.summary {
        write_summary(&report.summary, path)?;
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
