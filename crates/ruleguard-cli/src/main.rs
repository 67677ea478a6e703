mod errors;
mod parser;
mod runner;
mod writer;

use clap::{Parser, ValueEnum};
use tracing_subscriber::filter::EnvFilter;

/// Output format for validation results
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Print results to standard output (human-readable)
    Stdout,
    /// Output results in JSON format
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "ruleguard",
    version,
    about = "RuleGuard CLI - Business-rule validation for CSV and Parquet datasets",
    long_about = "RuleGuard applies the rule flows defined in a TOML configuration to a \
                  dataset and reports, for each rule, whether it passed.\n\n\
                  Example usage:\n  \
                  ruleguard --config rules.toml --flow orders --data orders.csv"
)]
struct Args {
    /// Path to the TOML configuration file that defines the rule flows
    #[arg(short, long, value_name = "FILE")]
    config: String,

    /// Run a single flow instead of every flow in the configuration
    #[arg(short, long, value_name = "ID")]
    flow: Option<String>,

    /// Data file (.csv or .parquet), overriding the flow's 'data' entry
    #[arg(long, value_name = "FILE")]
    data: Option<String>,

    /// Output format for validation results
    #[arg(short, long, value_enum, default_value = "stdout")]
    output: OutputFormat,

    /// File or directory receiving the JSON report
    #[arg(long, value_name = "PATH")]
    out_file: Option<String>,

    /// Evaluate the rules of a flow in parallel
    #[arg(long)]
    parallel: bool,

    /// Fetch each historical statistic only once per run
    #[arg(long)]
    cache_stats: bool,

    /// Enable debug logging and detailed error backtraces
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    let args = Args::parse();

    if args.debug {
        // SAFETY: set before any other thread is spawned
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }
    init_tracing(args.debug);

    match runner::run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            if args.debug {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("Error: {:#}", err);
                eprintln!("\nHint: Run with --debug flag for detailed stack traces");
            }
            std::process::exit(1);
        }
    }
}
