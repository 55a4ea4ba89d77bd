use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub(crate) const DEFAULT_REPORT_PATH: &str = "api_test_detailed_report.json";
pub(crate) const DEFAULT_CONFIG_FILE: &str = "burstr.yaml";

/// Same grammar as durations in the YAML config (`250ms`, `1m30s`, `1h`, ...).
fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("duration cannot be empty (expected e.g. 10s, 250ms, 1m30s)".to_string());
    }

    let d = humantime::parse_duration(s).map_err(|err| {
        format!("invalid duration '{s}': {err} (expected e.g. 10s, 250ms, 1m30s)")
    })?;
    if d.is_zero() {
        return Err(format!("duration '{s}' must be positive"));
    }
    Ok(d)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Progress bar and a text summary.
    HumanReadable,
    /// Emit JSON progress lines (NDJSON) to stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "burstr",
    author,
    version,
    about = "Cycle-based HTTP load generator",
    long_about = "burstr fires bursts of concurrent GET requests at one URL.\n\nEach cycle launches --fan-out requests, at most --concurrency of which are in flight at once, and waits for all of them before the next cycle starts. Latency and status-code statistics are reported per cycle and for the whole run.",
    after_help = "Examples:\n  burstr run http://localhost:8025/\n  burstr run https://example.com/health --fan-out 100 --concurrency 10 --cycles 20\n  burstr run --config burstr.yaml --output json\n  burstr init ./load"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter used when RUST_LOG is not set (e.g. info, burstr_core=debug)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a load test against a URL
    #[command(
        long_about = "Run cycles of concurrent GET requests against the target URL.\n\nCLI flags override values from --config, which override built-in defaults."
    )]
    Run(RunArgs),

    /// Scaffold a commented burstr.yaml
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Target directory to initialize (created if missing)
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Target URL (http or https)
    pub url: Option<String>,

    /// Requests launched per cycle
    #[arg(long, value_name = "N")]
    pub fan_out: Option<u64>,

    /// Maximum requests in flight at once
    #[arg(long, short = 'c', value_name = "K")]
    pub concurrency: Option<u64>,

    /// Number of sequential cycles
    #[arg(long, value_name = "M")]
    pub cycles: Option<u64>,

    /// Per-request timeout (e.g. 10s, 250ms, 1m30s)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// TCP connect timeout (e.g. 3s)
    #[arg(long, value_parser = parse_duration)]
    pub connect_timeout: Option<Duration>,

    /// YAML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where to write the detailed JSON report
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Do not write the detailed JSON report
    #[arg(long, conflicts_with = "report")]
    pub no_report: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,

    /// Exit with code 10 when any request failed
    #[arg(long)]
    pub fail_on_errors: bool,
}
