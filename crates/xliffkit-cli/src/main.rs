use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod commands;

use commands::{ConflictPolicyArg, SamplePolicyArg};

#[derive(Parser)]
#[command(name = "xliffkit", version, about = "XLIFF reconciliation toolkit")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Suppress per-command summary lines
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge every .xliff file in a directory into one document
    Combine {
        /// Directory containing the .xliff files to merge
        #[arg(short, long)]
        input_dir: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// What to do with duplicate unit ids
        #[arg(long)]
        policy: Option<ConflictPolicyArg>,
    },

    /// Extract the units present in the baseline but missing from the comparison
    Diff {
        #[arg(long)]
        baseline: PathBuf,
        #[arg(long)]
        comparison: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },

    /// Attach a second translation as an extra slot by matching unit ids
    Enrich {
        #[arg(long)]
        primary: PathBuf,
        #[arg(long)]
        secondary: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Slot name for the injected translation
        #[arg(long)]
        slot: Option<String>,
    },

    /// Extract a subset of units for manual review
    Sample {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// How many units to keep
        #[arg(short = 'n', long)]
        count: Option<usize>,
        #[arg(long)]
        policy: Option<SamplePolicyArg>,
    },

    /// Flatten a document into CSV rows for spreadsheet review
    ExportCsv {
        #[arg(short, long)]
        input: PathBuf,
        /// Output CSV path; stdout when omitted
        #[arg(long)]
        out_csv: Option<PathBuf>,
        /// Translation slot for the first translation column
        #[arg(long)]
        slot: Option<String>,
        /// Slot for an optional second translation column
        #[arg(long)]
        second_slot: Option<String>,
        /// Randomize which slot lands in which column, per row
        #[arg(long, default_value_t = false)]
        blind: bool,
        /// Where to write the blind column mapping (JSON)
        #[arg(long)]
        mapping_out: Option<PathBuf>,
    },

    /// Dump `"source"="target"` pairs as one flat line for prompt building
    ExportStrings {
        #[arg(short, long)]
        input: PathBuf,
        /// Output path; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        /// Cap on the number of units considered, front of the document first
        #[arg(long, default_value_t = 200)]
        limit: usize,
    },
}

trait Runnable {
    fn run(self, use_color: bool, quiet: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool, quiet: bool) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!("▶ Starting command: {}", cmd_name);

        let result = match self {
            Commands::Combine { input_dir, out, policy } => {
                commands::run_combine(input_dir, out, policy, use_color, quiet)
            }
            Commands::Diff { baseline, comparison, out } => {
                commands::run_diff(baseline, comparison, out, use_color, quiet)
            }
            Commands::Enrich { primary, secondary, out, slot } => {
                commands::run_enrich(primary, secondary, out, slot, use_color, quiet)
            }
            Commands::Sample { input, out, count, policy } => {
                commands::run_sample(input, out, count, policy, use_color, quiet)
            }
            Commands::ExportCsv { input, out_csv, slot, second_slot, blind, mapping_out } => {
                commands::run_export_csv(
                    input, out_csv, slot, second_slot, blind, mapping_out, use_color, quiet,
                )
            }
            Commands::ExportStrings { input, out, limit } => {
                commands::run_export_strings(input, out, limit, use_color, quiet)
            }
        };

        match &result {
            Ok(_) => info!("✔ Finished command: {}", cmd_name),
            Err(e) => error!("✖ Command {} failed: {:?}", cmd_name, e),
        }

        result
    }
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = rolling::daily("logs", "xliffkit.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Console logs go to stderr so stdout stays clean for CSV export.
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color, cli.quiet)
}
