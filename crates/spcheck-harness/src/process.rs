//! [`Toolchain`] backed by real subprocesses, plus tool discovery.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::config::ToolsConfig;
use crate::error::{ToolError, ToolMissing};
use crate::toolchain::{SimulatorRun, ToolRun, Toolchain};

/// Runs the configured tools as child processes.
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    compiler: PathBuf,
    merger: PathBuf,
    linker: PathBuf,
    simulator: PathBuf,
    compiler_args: Vec<String>,
    linker_args: Vec<String>,
    input_symbol: String,
    simulator_args: Vec<String>,
}

impl ProcessToolchain {
    /// Resolve every tool before any work starts.
    ///
    /// The compiler and merger are looked up in `bin_dir`; the linker and the
    /// simulator on `PATH`. Names that are already paths are used as given.
    pub fn discover(bin_dir: &Path, tools: &ToolsConfig) -> Result<Self, ToolMissing> {
        Ok(Self {
            compiler: find_in_dir(bin_dir, &tools.compiler)?,
            merger: find_in_dir(bin_dir, &tools.merger)?,
            linker: find_on_path(&tools.linker)?,
            simulator: find_on_path(&tools.simulator)?,
            compiler_args: tools.compiler_args.clone(),
            linker_args: tools.linker_args.clone(),
            input_symbol: tools.input_symbol.clone(),
            simulator_args: tools.simulator_args.clone(),
        })
    }

    /// Resolved tool paths, for diagnostics.
    pub fn tools(&self) -> [(&'static str, &Path); 4] {
        [
            ("compiler", self.compiler.as_path()),
            ("merger", self.merger.as_path()),
            ("linker", self.linker.as_path()),
            ("simulator", self.simulator.as_path()),
        ]
    }
}

impl Toolchain for ProcessToolchain {
    fn compile(&self, input: &Path, flags: &[String], output: &Path) -> Result<ToolRun, ToolError> {
        let mut cmd = Command::new(&self.compiler);
        cmd.arg(input)
            .args(flags)
            .args(&self.compiler_args)
            .arg("-o")
            .arg(output);
        tool_run(&self.compiler, &mut cmd)
    }

    fn merge(
        &self,
        start_routine: &Path,
        source: &Path,
        output: &Path,
    ) -> Result<ToolRun, ToolError> {
        let mut cmd = Command::new(&self.merger);
        cmd.arg(start_routine).arg(source).arg("-o").arg(output);
        tool_run(&self.merger, &mut cmd)
    }

    fn link(&self, object: &Path, input: &str, output: &Path) -> Result<ToolRun, ToolError> {
        let mut cmd = Command::new(&self.linker);
        cmd.args(&self.linker_args)
            .arg("-o")
            .arg(output)
            .arg(object)
            .arg("--defsym")
            .arg(format!("{}={input}", self.input_symbol));
        tool_run(&self.linker, &mut cmd)
    }

    fn simulate(&self, executable: &Path) -> Result<SimulatorRun, ToolError> {
        let mut cmd = Command::new(&self.simulator);
        cmd.arg(executable).args(&self.simulator_args);
        let output = capture(&self.simulator, &mut cmd)?;
        Ok(SimulatorRun {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn capture(tool: &Path, cmd: &mut Command) -> Result<Output, ToolError> {
    cmd.output().map_err(|source| ToolError {
        tool: tool.display().to_string(),
        source,
    })
}

fn tool_run(tool: &Path, cmd: &mut Command) -> Result<ToolRun, ToolError> {
    let output = capture(tool, cmd)?;
    Ok(ToolRun {
        success: output.status.success(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn is_path_like(name: &str) -> bool {
    Path::new(name).components().count() > 1 || Path::new(name).is_absolute()
}

fn find_in_dir(dir: &Path, name: &str) -> Result<PathBuf, ToolMissing> {
    let candidate = if is_path_like(name) {
        PathBuf::from(name)
    } else {
        dir.join(name)
    };
    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(ToolMissing {
            tool: name.to_string(),
            searched: dir.display().to_string(),
        })
    }
}

fn find_on_path(name: &str) -> Result<PathBuf, ToolMissing> {
    if is_path_like(name) {
        let candidate = PathBuf::from(name);
        return if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(ToolMissing {
                tool: name.to_string(),
                searched: candidate.display().to_string(),
            })
        };
    }
    let paths = env::var_os("PATH").unwrap_or_default();
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ToolMissing {
            tool: name.to_string(),
            searched: "PATH".to_string(),
        })
}
