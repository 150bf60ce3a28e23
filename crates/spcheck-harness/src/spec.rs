//! Execution arguments: one input value and the exit code it must produce.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SpecError;

/// Minimum number of execution arguments: one reference plus one to compare.
pub const MIN_EXECUTION_ARGS: usize = 2;

/// One declared test case, parsed from `input=expected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionSpec {
    /// Literal bound to the program's input symbol at link time.
    pub input: String,
    /// Exit code the simulator must report.
    pub expected: i32,
}

impl ExecutionSpec {
    pub fn new(input: impl Into<String>, expected: i32) -> Self {
        Self {
            input: input.into(),
            expected,
        }
    }

    /// Parse a full list of execution arguments, requiring at least
    /// [`MIN_EXECUTION_ARGS`] of them.
    pub fn parse_all<S: AsRef<str>>(args: &[S]) -> Result<Vec<Self>, SpecError> {
        if args.len() < MIN_EXECUTION_ARGS {
            return Err(SpecError::TooFew {
                required: MIN_EXECUTION_ARGS,
                found: args.len(),
            });
        }
        args.iter().map(|arg| arg.as_ref().parse()).collect()
    }
}

impl FromStr for ExecutionSpec {
    type Err = SpecError;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        let (input, expected) = arg
            .split_once('=')
            .ok_or_else(|| SpecError::MissingSeparator { arg: arg.into() })?;
        if input.is_empty() {
            return Err(SpecError::EmptyInput { arg: arg.into() });
        }
        let expected = expected
            .trim()
            .parse()
            .map_err(|_| SpecError::InvalidExpected {
                arg: arg.into(),
                value: expected.into(),
            })?;
        Ok(Self::new(input, expected))
    }
}

impl fmt::Display for ExecutionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.input, self.expected)
    }
}
