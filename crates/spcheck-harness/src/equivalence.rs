//! Cross-input equivalence of one compiled configuration.
//!
//! Every execution argument is checked for its exit code. For single-path
//! configurations the normalized statistics of every run must also equal those
//! of the first run; equality is transitive, so comparing against that one
//! reference covers every pair.

use std::path::Path;

use spcheck_stats::{unified_diff, CanonicalStats};

use crate::error::TestFailure;
use crate::execution::ExecutionChecker;
use crate::spec::ExecutionSpec;
use crate::toolchain::Toolchain;

/// Result of a passing equivalence check.
#[derive(Debug, Clone)]
pub struct EquivalenceOutcome {
    /// Statistics of the first execution argument.
    pub reference: CanonicalStats,
    /// Number of executions performed.
    pub executions: usize,
    /// Number of runs whose statistics were compared against the reference.
    pub compared: usize,
}

/// Runs all execution arguments against one compiled program.
pub struct EquivalenceDriver<'a, T: Toolchain + ?Sized> {
    checker: ExecutionChecker<'a, T>,
}

impl<'a, T: Toolchain + ?Sized> EquivalenceDriver<'a, T> {
    pub fn new(toolchain: &'a T) -> Self {
        Self {
            checker: ExecutionChecker::new(toolchain),
        }
    }

    /// Check `specs` in order, stopping at the first failure.
    pub fn check(
        &self,
        program: &Path,
        specs: &[ExecutionSpec],
        single_path: bool,
    ) -> Result<EquivalenceOutcome, TestFailure> {
        let (first, rest) = specs.split_first().ok_or(TestFailure::NoExecutionSpecs)?;
        let reference = self.checker.run(program, first)?;

        let mut compared = 0;
        for spec in rest {
            let stats = self.checker.run(program, spec)?;
            if !single_path {
                continue;
            }
            compared += 1;
            if stats != reference {
                let diff = unified_diff(
                    &reference.text(),
                    &stats.text(),
                    &first.to_string(),
                    &spec.to_string(),
                );
                return Err(TestFailure::EquivalenceViolation {
                    program: program.to_path_buf(),
                    reference: first.clone(),
                    candidate: spec.clone(),
                    reference_stats: reference,
                    candidate_stats: stats,
                    diff,
                });
            }
        }

        Ok(EquivalenceOutcome {
            reference,
            executions: specs.len(),
            compared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecutionFailure;
    use crate::testing::{stats_report, FakeToolchain};
    use crate::toolchain::SimulatorRun;

    fn specs(args: &[&str]) -> Vec<ExecutionSpec> {
        ExecutionSpec::parse_all(args).unwrap()
    }

    /// Cycles grow with the input; exit code is always 0.
    fn input_dependent() -> FakeToolchain {
        FakeToolchain::new(|input, _| SimulatorRun {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: stats_report(100 + input.parse::<u64>().unwrap(), 1),
        })
    }

    fn constant() -> FakeToolchain {
        FakeToolchain::new(|_, _| SimulatorRun {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: stats_report(100, 1),
        })
    }

    #[test]
    fn traditional_code_skips_comparison() {
        let tools = input_dependent();
        let outcome = EquivalenceDriver::new(&tools)
            .check(Path::new("prog.o"), &specs(&["1=0", "2=0", "3=0"]), false)
            .unwrap();
        assert_eq!(outcome.executions, 3);
        assert_eq!(outcome.compared, 0);
        assert_eq!(outcome.reference.cycles(), Some("101"));
    }

    #[test]
    fn traditional_code_still_checks_exit_codes() {
        let tools = input_dependent();
        let err = EquivalenceDriver::new(&tools)
            .check(Path::new("prog.o"), &specs(&["1=0", "2=3"]), false)
            .unwrap_err();
        assert!(matches!(
            err,
            TestFailure::Execution(ExecutionFailure::WrongResult {
                expected: 3,
                actual: Some(0),
                ..
            })
        ));
    }

    #[test]
    fn single_path_identical_stats_pass() {
        let tools = constant();
        let outcome = EquivalenceDriver::new(&tools)
            .check(Path::new("prog.o"), &specs(&["1=0", "2=0", "3=0"]), true)
            .unwrap();
        assert_eq!(outcome.compared, 2);
    }

    #[test]
    fn single_path_divergence_names_the_pair() {
        let tools = FakeToolchain::new(|input, _| SimulatorRun {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: stats_report(if input == "3" { 140 } else { 100 }, 1),
        });
        let err = EquivalenceDriver::new(&tools)
            .check(Path::new("prog.o"), &specs(&["1=0", "2=0", "3=0", "4=0"]), true)
            .unwrap_err();
        match err {
            TestFailure::EquivalenceViolation {
                reference,
                candidate,
                diff,
                ..
            } => {
                assert_eq!(reference.to_string(), "1=0");
                assert_eq!(candidate.to_string(), "3=0");
                assert!(diff.contains("-Cycles: 100\n+Cycles: 140\n"));
            }
            other => panic!("expected EquivalenceViolation, got {other:?}"),
        }
        // stopped at the first mismatch: input 4 was never linked
        assert!(!tools.calls().iter().any(|c| c.contains("input=4")));
    }

    #[test]
    fn first_spec_is_validated_before_any_comparison() {
        let tools = input_dependent();
        let err = EquivalenceDriver::new(&tools)
            .check(Path::new("prog.o"), &specs(&["1=9", "2=0"]), true)
            .unwrap_err();
        assert!(matches!(
            err,
            TestFailure::Execution(ExecutionFailure::WrongResult { ref input, .. }) if input == "1"
        ));
        assert_eq!(tools.calls().len(), 2);
    }

    #[test]
    fn empty_spec_list() {
        let tools = constant();
        let err = EquivalenceDriver::new(&tools)
            .check(Path::new("prog.o"), &[], true)
            .unwrap_err();
        assert!(matches!(err, TestFailure::NoExecutionSpecs));
    }
}
