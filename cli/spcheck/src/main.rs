//! spcheck: single-path equivalence checker for the compiler backend.
//!
//! Compiles one program under the configured flag matrix, runs every build on
//! the simulator with each execution argument, and fails on the first wrong
//! exit code or, for single-path builds, the first divergence in statistics.

mod check;

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(
    name = "spcheck",
    version,
    about = "Check single-path code generation for result correctness and input-independent execution"
)]
struct Cli {
    /// Any binary in the LLVM build directory; its directory is searched for the compiler and merger
    tool_marker: PathBuf,
    /// Source program to test
    source: PathBuf,
    /// Substitute source tested instead of SOURCE; pass "" to test SOURCE
    substitute: String,
    /// Output path of the compiled object (overwritten per configuration)
    compiled: PathBuf,
    /// Object file of the start routine linked with the program
    start_routine: PathBuf,
    /// Execution arguments of the form input=expected-exit-code (at least two)
    #[arg(required = true, num_args = 2.., allow_hyphen_values = true)]
    exec_args: Vec<String>,
    /// Harness configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Human)]
    report: ReportFormat,
    /// Print each configuration as it is checked
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Human,
    Json,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    if let Err(e) = check::run(&cli.into()) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

impl From<Cli> for check::CheckOptions {
    fn from(cli: Cli) -> Self {
        let source = if cli.substitute.is_empty() {
            cli.source
        } else {
            PathBuf::from(cli.substitute)
        };
        Self {
            tool_marker: cli.tool_marker,
            source,
            compiled: cli.compiled,
            start_routine: cli.start_routine,
            exec_args: cli.exec_args,
            config: cli.config,
            json: cli.report == ReportFormat::Json,
            verbose: cli.verbose,
        }
    }
}
