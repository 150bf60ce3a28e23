//! Summary of a passing matrix run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use spcheck_stats::StatEntry;

use crate::equivalence::EquivalenceOutcome;
use crate::matrix::CompileConfiguration;
use crate::spec::ExecutionSpec;

/// Hex digits of the stats fingerprint shown in the human-readable report.
const SHORT_FINGERPRINT: usize = 12;

/// Result of one checked configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationReport {
    /// Compiler flags of the configuration.
    pub flags: String,
    /// Whether cross-input equivalence was enforced.
    pub single_path: bool,
    /// Executions performed.
    pub executions: usize,
    /// Executions compared against the reference run.
    pub compared: usize,
    /// SHA-256 of the reference run's canonical statistics.
    pub fingerprint: String,
    /// Canonical statistics of the reference run.
    pub statistics: Vec<StatEntry>,
}

impl ConfigurationReport {
    pub fn new(configuration: &CompileConfiguration, outcome: &EquivalenceOutcome) -> Self {
        Self {
            flags: configuration.flag_string(),
            single_path: configuration.uses_single_path(),
            executions: outcome.executions,
            compared: outcome.compared,
            fingerprint: outcome.reference.fingerprint(),
            statistics: outcome.reference.entries().to_vec(),
        }
    }
}

/// Report over every configuration of a matrix run, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixReport {
    /// Source program that was tested.
    pub program: PathBuf,
    /// Execution arguments, as given.
    pub execution_args: Vec<String>,
    pub configurations: Vec<ConfigurationReport>,
}

impl MatrixReport {
    pub fn new(program: &Path, specs: &[ExecutionSpec]) -> Self {
        Self {
            program: program.to_path_buf(),
            execution_args: specs.iter().map(ToString::to_string).collect(),
            configurations: Vec::new(),
        }
    }

    pub fn push(&mut self, configuration: ConfigurationReport) {
        self.configurations.push(configuration);
    }

    pub fn single_path_count(&self) -> usize {
        self.configurations.iter().filter(|c| c.single_path).count()
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for MatrixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Single-Path Equivalence Report ===")?;
        writeln!(f, "Program: {}", self.program.display())?;
        writeln!(f, "Execution arguments: {}", self.execution_args.join(", "))?;
        writeln!(f)?;

        writeln!(f, "--- Configurations ({}) ---", self.configurations.len())?;
        let width = self
            .configurations
            .iter()
            .map(|c| display_flags(&c.flags).len())
            .max()
            .unwrap_or(0);
        for c in &self.configurations {
            let mode = if c.single_path {
                format!("single-path, {} compared", c.compared)
            } else {
                "traditional".to_string()
            };
            let short = &c.fingerprint[..c.fingerprint.len().min(SHORT_FINGERPRINT)];
            writeln!(
                f,
                "  {:<width$}  {} runs  {mode:<24}  {short}",
                display_flags(&c.flags),
                c.executions,
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "All {} configurations passed ({} single-path).",
            self.configurations.len(),
            self.single_path_count()
        )
    }
}

fn display_flags(flags: &str) -> String {
    if flags.is_empty() {
        "[default]".to_string()
    } else {
        format!("[{flags}]")
    }
}
