//! Harness errors.
//!
//! Every failure is terminal for the whole run. The `Display` impls render the
//! full diagnostic dump an operator needs, so callers print them as-is.

use std::path::PathBuf;

use spcheck_stats::{CanonicalStats, StatsError};
use thiserror::Error;

use crate::spec::ExecutionSpec;

/// An execution argument could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("execution argument '{arg}' is not of the form input=expected")]
    MissingSeparator { arg: String },

    #[error("execution argument '{arg}' has an empty input value")]
    EmptyInput { arg: String },

    #[error("execution argument '{arg}' has a non-integer expected exit code '{value}'")]
    InvalidExpected { arg: String, value: String },

    #[error("must have at least {required} execution arguments but got {found}")]
    TooFew { required: usize, found: usize },
}

/// The harness configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("flag matrix group {index} has no alternatives")]
    EmptyGroup { index: usize },

    #[error("config field '{field}' must not be empty")]
    EmptyField { field: &'static str },
}

/// A required external tool was not found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required tool '{tool}' could not be found (searched {searched})")]
pub struct ToolMissing {
    pub tool: String,
    pub searched: String,
}

/// An external tool could not be started at all.
#[derive(Debug, Error)]
#[error("failed to invoke '{tool}': {source}")]
pub struct ToolError {
    pub tool: String,
    pub source: std::io::Error,
}

/// Failure of a single link + simulate + normalize cycle.
#[derive(Debug, Error)]
pub enum ExecutionFailure {
    #[error(
        "failed to generate executable from '{}' for argument '{input}'{}",
        program.display(),
        tool_output(stderr)
    )]
    LinkError {
        program: PathBuf,
        input: String,
        stderr: String,
    },

    #[error("{}", wrong_result_dump(program, input, *expected, *actual, stdout, stderr))]
    WrongResult {
        program: PathBuf,
        input: String,
        expected: i32,
        /// `None` when the simulator was terminated by a signal.
        actual: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error(
        "the simulator printed no statistics for '{}' with input '{input}' ({source})\n{}",
        program.display(),
        section("stderr", raw)
    )]
    MalformedReport {
        program: PathBuf,
        input: String,
        raw: String,
        source: StatsError,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Failure while checking one compiled configuration.
#[derive(Debug, Error)]
pub enum TestFailure {
    #[error("no execution arguments to check")]
    NoExecutionSpecs,

    #[error(transparent)]
    Execution(#[from] ExecutionFailure),

    #[error(
        "the execution of '{}' for execution arguments '{reference}' and '{candidate}' weren't equivalent\n{diff}",
        program.display()
    )]
    EquivalenceViolation {
        program: PathBuf,
        reference: ExecutionSpec,
        candidate: ExecutionSpec,
        reference_stats: CanonicalStats,
        candidate_stats: CanonicalStats,
        diff: String,
    },

    #[error("failed to compile '{}'{}", input.display(), tool_output(stderr))]
    CompileError { input: PathBuf, stderr: String },

    #[error(
        "failed to link '{}' and '{}'{}",
        program.display(),
        start_routine.display(),
        tool_output(stderr)
    )]
    LinkError {
        program: PathBuf,
        start_routine: PathBuf,
        stderr: String,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// A configuration of the flag matrix failed; the traversal stopped there.
#[derive(Debug, Error)]
#[error("{failure}\ncompiler flags: [{configuration}]")]
pub struct MatrixFailure {
    /// Flag string of the failing configuration.
    pub configuration: String,
    pub failure: TestFailure,
}

const RULE_WIDTH: usize = 50;

fn section(title: &str, body: &str) -> String {
    format!(
        "{:-^width$}\n{body}\n",
        format!(" {title} "),
        width = RULE_WIDTH
    )
}

fn tool_output(stderr: &str) -> String {
    if stderr.trim().is_empty() {
        String::new()
    } else {
        format!("\n{}", stderr.trim_end())
    }
}

fn wrong_result_dump(
    program: &std::path::Path,
    input: &str,
    expected: i32,
    actual: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> String {
    let actual = match actual {
        Some(code) => code.to_string(),
        None => "terminated by signal".to_string(),
    };
    format!(
        "the execution of '{}' for input argument '{input}' gave the wrong exit code\n{}{}{}{}{}",
        program.display(),
        section("Expected", &expected.to_string()),
        section("Actual", &actual),
        section("stdout", stdout),
        section("stderr", stderr),
        "-".repeat(RULE_WIDTH),
    )
}
