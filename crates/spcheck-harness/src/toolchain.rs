//! The seam between the harness and the external compile/link/simulate tools.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ToolError;

/// Observable result of a compiler, merger, or linker invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRun {
    /// Whether the tool exited with status 0.
    pub success: bool,
    /// Captured diagnostic output.
    pub stderr: String,
}

impl ToolRun {
    pub fn ok() -> Self {
        Self {
            success: true,
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stderr: stderr.into(),
        }
    }
}

/// Observable result of one simulator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatorRun {
    /// The program's exit code; `None` if the simulator died from a signal.
    pub exit_code: Option<i32>,
    /// The program's own output.
    pub stdout: String,
    /// The diagnostic stream, carrying the statistics report.
    pub stderr: String,
}

/// External tools used to build and run one test program.
///
/// Implementations block until the tool has finished.
pub trait Toolchain {
    /// Compile `input` under `flags` into the object file `output`.
    fn compile(&self, input: &Path, flags: &[String], output: &Path) -> Result<ToolRun, ToolError>;

    /// Merge the start routine with the program source into `output`.
    fn merge(&self, start_routine: &Path, source: &Path, output: &Path)
        -> Result<ToolRun, ToolError>;

    /// Link `object` into a loadable executable with `input` bound as a
    /// link-time symbol.
    fn link(&self, object: &Path, input: &str, output: &Path) -> Result<ToolRun, ToolError>;

    /// Run `executable` on the simulator.
    fn simulate(&self, executable: &Path) -> Result<SimulatorRun, ToolError>;
}

/// Path of the executable built from `object` for one input value: the input
/// is appended to the object's file name (`prog.o` + `5` = `prog.o5`).
pub fn executable_path(object: &Path, input: &str) -> PathBuf {
    let mut path = OsString::from(object.as_os_str());
    path.push(input);
    PathBuf::from(path)
}
