//! Flag matrix expansion and the per-configuration compile + check cycle.

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::equivalence::{EquivalenceDriver, EquivalenceOutcome};
use crate::error::{MatrixFailure, TestFailure};
use crate::report::{ConfigurationReport, MatrixReport};
use crate::spec::ExecutionSpec;
use crate::toolchain::Toolchain;

/// Mutually exclusive flag alternatives; `""` means "no extra flag".
pub type FlagGroup = Vec<String>;

/// Ordered flag groups whose cartesian product forms the test matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagMatrix {
    groups: Vec<FlagGroup>,
}

/// One concrete set of compiler flags from the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfiguration {
    flags: Vec<String>,
    uses_single_path: bool,
}

impl CompileConfiguration {
    pub fn new(flags: Vec<String>, single_path_flag: &str) -> Self {
        let uses_single_path = flags.join(" ").contains(single_path_flag);
        Self {
            flags,
            uses_single_path,
        }
    }

    /// Flag tokens as passed to the compiler.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Flags joined by single spaces; the configuration's identity.
    pub fn flag_string(&self) -> String {
        self.flags.join(" ")
    }

    pub fn uses_single_path(&self) -> bool {
        self.uses_single_path
    }
}

impl fmt::Display for CompileConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag_string())
    }
}

impl FlagMatrix {
    pub fn new(groups: Vec<FlagGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[FlagGroup] {
        &self.groups
    }

    /// Number of leaf configurations.
    pub fn configuration_count(&self) -> usize {
        self.groups.iter().map(Vec::len).product()
    }

    /// All configurations in traversal order: groups in order, alternatives
    /// in order within each group, earlier groups varying slowest.
    pub fn configurations(
        &self,
        base_flags: &[String],
        single_path_flag: &str,
    ) -> Vec<CompileConfiguration> {
        let mut out = Vec::with_capacity(self.configuration_count());
        let walked = self.walk::<Infallible>(base_flags, single_path_flag, &mut |configuration| {
            out.push(configuration);
            Ok(())
        });
        if let Err(never) = walked {
            match never {}
        }
        out
    }

    /// Visit every configuration in traversal order, stopping at the first
    /// error returned by `visit`.
    pub fn walk<E>(
        &self,
        base_flags: &[String],
        single_path_flag: &str,
        visit: &mut dyn FnMut(CompileConfiguration) -> Result<(), E>,
    ) -> Result<(), E> {
        let accumulated = base_flags
            .iter()
            .flat_map(|flag| flag.split_whitespace())
            .map(str::to_string)
            .collect();
        expand(accumulated, &self.groups, single_path_flag, visit)
    }
}

fn expand<E>(
    accumulated: Vec<String>,
    groups: &[FlagGroup],
    single_path_flag: &str,
    visit: &mut dyn FnMut(CompileConfiguration) -> Result<(), E>,
) -> Result<(), E> {
    let Some((group, rest)) = groups.split_first() else {
        return visit(CompileConfiguration::new(accumulated, single_path_flag));
    };
    for alternative in group {
        let mut flags = accumulated.clone();
        flags.extend(alternative.split_whitespace().map(str::to_string));
        expand(flags, rest, single_path_flag, visit)?;
    }
    Ok(())
}

/// Files of the program under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestProgram {
    /// Source to compile.
    pub source: PathBuf,
    /// Start routine merged with the source before final compilation.
    pub start_routine: PathBuf,
    /// Compiled object path; overwritten by every configuration.
    pub compiled: PathBuf,
}

/// Compiles and checks the program under every configuration of a matrix.
///
/// Runs strictly sequentially: all configurations share the artifact paths of
/// the [`TestProgram`].
pub struct MatrixRunner<'a, T: Toolchain + ?Sized> {
    toolchain: &'a T,
    program: &'a TestProgram,
    specs: &'a [ExecutionSpec],
    single_path_flag: &'a str,
    progress: Option<&'a dyn Fn(&CompileConfiguration)>,
}

impl<'a, T: Toolchain + ?Sized> MatrixRunner<'a, T> {
    pub fn new(
        toolchain: &'a T,
        program: &'a TestProgram,
        specs: &'a [ExecutionSpec],
        single_path_flag: &'a str,
    ) -> Self {
        Self {
            toolchain,
            program,
            specs,
            single_path_flag,
            progress: None,
        }
    }

    /// Call `progress` before each configuration is checked.
    pub fn with_progress(mut self, progress: &'a dyn Fn(&CompileConfiguration)) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Check every configuration of `matrix`; the first failure aborts the
    /// traversal.
    pub fn run(
        &self,
        base_flags: &[String],
        matrix: &FlagMatrix,
    ) -> Result<MatrixReport, MatrixFailure> {
        let mut report = MatrixReport::new(&self.program.source, self.specs);
        matrix.walk(base_flags, self.single_path_flag, &mut |configuration| {
            if let Some(progress) = self.progress {
                progress(&configuration);
            }
            let outcome =
                self.check_configuration(&configuration)
                    .map_err(|failure| MatrixFailure {
                        configuration: configuration.flag_string(),
                        failure,
                    })?;
            report.push(ConfigurationReport::new(&configuration, &outcome));
            Ok(())
        })?;
        Ok(report)
    }

    /// Compile the program under one configuration and check all execution
    /// arguments against it.
    pub fn check_configuration(
        &self,
        configuration: &CompileConfiguration,
    ) -> Result<EquivalenceOutcome, TestFailure> {
        let program = self.program;
        let flags = configuration.flags();

        // Standalone compile surfaces compile errors early; its output is overwritten below.
        let run = self
            .toolchain
            .compile(&program.source, flags, &program.compiled)?;
        if !run.success {
            return Err(TestFailure::CompileError {
                input: program.source.clone(),
                stderr: run.stderr,
            });
        }

        let run =
            self.toolchain
                .merge(&program.start_routine, &program.source, &program.compiled)?;
        if !run.success {
            return Err(TestFailure::LinkError {
                program: program.source.clone(),
                start_routine: program.start_routine.clone(),
                stderr: run.stderr,
            });
        }

        let run = self
            .toolchain
            .compile(&program.compiled, flags, &program.compiled)?;
        if !run.success {
            return Err(TestFailure::CompileError {
                input: program.source.clone(),
                stderr: run.stderr,
            });
        }

        EquivalenceDriver::new(self.toolchain).check(
            &program.compiled,
            self.specs,
            configuration.uses_single_path(),
        )
    }
}
