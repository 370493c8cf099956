//! decorate CLI - writes capability decorators as Rust source
//!
//! ```text
//! decorate -p meters -f decorate_meter -b api::Meter \
//!     -t 'api::Battery,soc,fn() -> Result<f64, api::Error>' \
//!     -t 'api::BatteryRange,range,fn() -> i64' \
//!     -o src/meters/decorators
//! ```
//!
//! Exit status: 0 on success, 1 when `--check` finds stale output, 2 for
//! every other failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use decorate::config::{DEFAULT_API, DEFAULT_FUNCTION};
use decorate::{Config, Error};

/// Generate one composite type per capability combination plus an
/// exact-match dispatcher.
#[derive(Parser)]
#[command(name = "decorate")]
#[command(version)]
struct Cli {
    /// Output file (`.rs` is appended if missing); stdout when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Target module name, recorded in the generated-file marker
    #[arg(short, long)]
    package: Option<String>,

    /// Module defining the capability contracts
    #[arg(short, long, default_value = DEFAULT_API)]
    api: String,

    /// Dispatch function name
    #[arg(short, long, default_value = DEFAULT_FUNCTION)]
    function: String,

    /// Base trait path, e.g. `api::Meter`
    #[arg(short, long)]
    base: Option<String>,

    /// Capability record `Trait,method,signature`; repeatable
    #[arg(short = 't', long = "type", value_name = "RECORD")]
    types: Vec<String>,

    /// Verify that `--out` is up to date instead of writing it
    #[arg(long)]
    check: bool,

    /// More log output (`-v` info, `-vv` debug); `RUST_LOG` takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            package: self.package.clone().unwrap_or_default(),
            api: self.api.clone(),
            function: self.function.clone(),
            base: self.base.clone().unwrap_or_default(),
            types: self.types.clone(),
            out: self.out.clone(),
            check: self.check,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match decorate::run(&cli.config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ Error::Configuration(_)) => {
            eprintln!("decorate: {}", e);
            eprintln!("{}", Cli::command().render_usage());
            ExitCode::from(2)
        }
        Err(e @ Error::Stale { .. }) => {
            eprintln!("decorate: {}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("decorate: {}", e);
            ExitCode::from(2)
        }
    }
}
