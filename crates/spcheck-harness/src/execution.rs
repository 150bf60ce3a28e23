//! One link + simulate + normalize cycle for a single execution argument.

use std::path::Path;

use spcheck_stats::{normalize, CanonicalStats};

use crate::error::ExecutionFailure;
use crate::spec::ExecutionSpec;
use crate::toolchain::{executable_path, Toolchain};

/// Runs a compiled program with one input and validates its exit code.
pub struct ExecutionChecker<'a, T: Toolchain + ?Sized> {
    toolchain: &'a T,
}

impl<'a, T: Toolchain + ?Sized> ExecutionChecker<'a, T> {
    pub fn new(toolchain: &'a T) -> Self {
        Self { toolchain }
    }

    /// Link `program` with the spec's input, simulate it, and return the
    /// normalized statistics of the run.
    pub fn run(
        &self,
        program: &Path,
        spec: &ExecutionSpec,
    ) -> Result<CanonicalStats, ExecutionFailure> {
        let executable = executable_path(program, &spec.input);

        let link = self.toolchain.link(program, &spec.input, &executable)?;
        if !link.success {
            return Err(ExecutionFailure::LinkError {
                program: program.to_path_buf(),
                input: spec.input.clone(),
                stderr: link.stderr,
            });
        }

        let run = self.toolchain.simulate(&executable)?;
        if run.exit_code != Some(spec.expected) {
            return Err(ExecutionFailure::WrongResult {
                program: program.to_path_buf(),
                input: spec.input.clone(),
                expected: spec.expected,
                actual: run.exit_code,
                stdout: run.stdout,
                stderr: run.stderr,
            });
        }

        normalize(&run.stderr).map_err(|source| ExecutionFailure::MalformedReport {
            program: program.to_path_buf(),
            input: spec.input.clone(),
            raw: run.stderr.clone(),
            source,
        })
    }
}
