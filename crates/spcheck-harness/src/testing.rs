//! In-memory toolchain for unit tests.

use std::cell::RefCell;
use std::path::Path;

use crate::error::ToolError;
use crate::toolchain::{SimulatorRun, ToolRun, Toolchain};

type Simulator = Box<dyn Fn(&str, &[String]) -> SimulatorRun>;

/// Records every invocation and simulates runs through a closure receiving
/// the last linked input value and the last compiler flags.
pub(crate) struct FakeToolchain {
    simulator: Simulator,
    failing_compile_flag: Option<String>,
    failing_merge: bool,
    failing_link_input: Option<String>,
    flags: RefCell<Vec<String>>,
    input: RefCell<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeToolchain {
    pub fn new(simulator: impl Fn(&str, &[String]) -> SimulatorRun + 'static) -> Self {
        Self {
            simulator: Box::new(simulator),
            failing_compile_flag: None,
            failing_merge: false,
            failing_link_input: None,
            flags: RefCell::new(Vec::new()),
            input: RefCell::new(String::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make compilation fail whenever `flag` is among the flags.
    pub fn failing_compile(mut self, flag: &str) -> Self {
        self.failing_compile_flag = Some(flag.to_string());
        self
    }

    pub fn failing_merge(mut self) -> Self {
        self.failing_merge = true;
        self
    }

    pub fn failing_link(mut self, input: &str) -> Self {
        self.failing_link_input = Some(input.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl Toolchain for FakeToolchain {
    fn compile(&self, input: &Path, flags: &[String], output: &Path) -> Result<ToolRun, ToolError> {
        self.record(format!(
            "compile {} [{}] -> {}",
            input.display(),
            flags.join(" "),
            output.display()
        ));
        *self.flags.borrow_mut() = flags.to_vec();
        match &self.failing_compile_flag {
            Some(flag) if flags.contains(flag) => Ok(ToolRun::failed(format!("error: {flag}"))),
            _ => Ok(ToolRun::ok()),
        }
    }

    fn merge(
        &self,
        start_routine: &Path,
        source: &Path,
        output: &Path,
    ) -> Result<ToolRun, ToolError> {
        self.record(format!(
            "merge {} {} -> {}",
            start_routine.display(),
            source.display(),
            output.display()
        ));
        if self.failing_merge {
            Ok(ToolRun::failed("error: duplicate symbol"))
        } else {
            Ok(ToolRun::ok())
        }
    }

    fn link(&self, object: &Path, input: &str, output: &Path) -> Result<ToolRun, ToolError> {
        self.record(format!(
            "link {} input={input} -> {}",
            object.display(),
            output.display()
        ));
        *self.input.borrow_mut() = input.to_string();
        if self.failing_link_input.as_deref() == Some(input) {
            Ok(ToolRun::failed("error: undefined symbol"))
        } else {
            Ok(ToolRun::ok())
        }
    }

    fn simulate(&self, executable: &Path) -> Result<SimulatorRun, ToolError> {
        self.record(format!("simulate {}", executable.display()));
        let input = self.input.borrow();
        let flags = self.flags.borrow();
        Ok((self.simulator)(input.as_str(), flags.as_slice()))
    }
}

/// A raw statistics report with the given cycle count and `main` call count.
pub(crate) fn stats_report(cycles: u64, main_calls: u32) -> String {
    format!(
        "\
Pasim statistics:
Instruction Statistics:
   operation     #fetched   #retired  #discard   #fetched   #retired  #discard
         add:          10         10         0          5          5         0
         all:          10         10         0          5          5         0
      Cycles:      {cycles}
Profiling information:

    func            cycles
                    count     min     max
<main>
  0x20000     in main
       {main_calls}        900     900     900
"
    )
}
