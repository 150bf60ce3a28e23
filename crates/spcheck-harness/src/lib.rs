//! Compile/execute/compare harness for single-path code generation.
//!
//! A source program is compiled under every configuration of a flag matrix
//! and each build is run on the simulator with several inputs:
//! - **ExecutionChecker:** links one input into the binary, runs it, checks
//!   the exit code, and normalizes the simulator statistics
//! - **EquivalenceDriver:** runs every input; for single-path builds the
//!   statistics of all runs must be identical
//! - **MatrixRunner:** expands the flag matrix and drives compilation
//!
//! The first failure anywhere ends the run.

pub mod config;
pub mod equivalence;
pub mod error;
pub mod execution;
pub mod matrix;
pub mod process;
pub mod report;
pub mod spec;
pub mod toolchain;

#[cfg(test)]
mod testing;

pub use config::{HarnessConfig, ToolsConfig, SINGLE_PATH_FLAG};
pub use equivalence::{EquivalenceDriver, EquivalenceOutcome};
pub use error::{
    ConfigError, ExecutionFailure, MatrixFailure, SpecError, TestFailure, ToolError, ToolMissing,
};
pub use execution::ExecutionChecker;
pub use matrix::{CompileConfiguration, FlagGroup, FlagMatrix, MatrixRunner, TestProgram};
pub use process::ProcessToolchain;
pub use report::{ConfigurationReport, MatrixReport};
pub use spec::{ExecutionSpec, MIN_EXECUTION_ARGS};
pub use toolchain::{executable_path, SimulatorRun, ToolRun, Toolchain};
