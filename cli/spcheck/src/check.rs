//! Resolve tools and configuration, run the matrix, print the report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spcheck_harness::{
    CompileConfiguration, ExecutionSpec, HarnessConfig, MatrixRunner, ProcessToolchain,
    TestProgram,
};

/// Inputs of one checker run, after argument parsing.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub tool_marker: PathBuf,
    /// Source actually compiled (the substitute, when one was given).
    pub source: PathBuf,
    pub compiled: PathBuf,
    pub start_routine: PathBuf,
    pub exec_args: Vec<String>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
}

/// Run the checker. Tools and arguments are validated before any compilation.
pub fn run(options: &CheckOptions) -> Result<()> {
    let config = match &options.config {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HarnessConfig::default(),
    };
    let specs = ExecutionSpec::parse_all(options.exec_args.as_slice())?;

    let bin_dir = tool_dir(&options.tool_marker);
    let toolchain = ProcessToolchain::discover(bin_dir, &config.tools)?;
    if options.verbose {
        for (role, path) in toolchain.tools() {
            eprintln!("{role}: {}", path.display());
        }
    }

    let program = TestProgram {
        source: options.source.clone(),
        start_routine: options.start_routine.clone(),
        compiled: options.compiled.clone(),
    };
    let progress = |configuration: &CompileConfiguration| {
        eprintln!(
            "checking [{configuration}]{}",
            if configuration.uses_single_path() {
                " (single-path)"
            } else {
                ""
            }
        );
    };

    let mut runner = MatrixRunner::new(&toolchain, &program, &specs, &config.single_path_flag);
    if options.verbose {
        runner = runner.with_progress(&progress);
    }
    let report = runner.run(&config.base_flags, &config.matrix)?;

    if options.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Directory holding the compiler and merger: the parent of the marker binary.
fn tool_dir(marker: &Path) -> &Path {
    match marker.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
