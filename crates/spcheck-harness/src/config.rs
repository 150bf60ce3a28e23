//! Harness configuration: the flag matrix and the external tool contract.
//!
//! Loaded from an optional TOML file. Every field has a default, and the
//! defaults reproduce the standard single-path test matrix.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::matrix::FlagMatrix;

/// Flag marking a configuration as single-path.
pub const SINGLE_PATH_FLAG: &str = "-mpatmos-singlepath=";

/// Top-level harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HarnessConfig {
    /// Flags applied to every configuration, ahead of the matrix flags.
    pub base_flags: Vec<String>,
    /// A configuration is single-path iff its flag string contains this text.
    pub single_path_flag: String,
    /// Flag groups; each group lists mutually exclusive alternatives.
    pub matrix: FlagMatrix,
    /// External tools.
    pub tools: ToolsConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_flags: Vec::new(),
            single_path_flag: SINGLE_PATH_FLAG.to_string(),
            matrix: FlagMatrix::new(vec![
                vec![
                    // Traditional code
                    String::new(),
                    // Single-path without dual-issue
                    "-mpatmos-singlepath=main".to_string(),
                    // Single-path with dual-issue
                    "-mpatmos-singlepath=main -mpatmos-disable-vliw=false".to_string(),
                ],
                vec![String::new(), "-O1".to_string(), "-O2".to_string()],
            ]),
            tools: ToolsConfig::default(),
        }
    }
}

/// External tool names and fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ToolsConfig {
    /// Compiler, looked up in the LLVM binary directory.
    pub compiler: String,
    /// Merger linking the start routine with the source, looked up in the
    /// LLVM binary directory.
    pub merger: String,
    /// Final linker, looked up on `PATH`.
    pub linker: String,
    /// Cycle-accurate simulator, looked up on `PATH`.
    pub simulator: String,
    /// Arguments appended to every compiler invocation.
    pub compiler_args: Vec<String>,
    /// Arguments placed before the output path on every linker invocation.
    pub linker_args: Vec<String>,
    /// Symbol the input value is bound to at link time.
    pub input_symbol: String,
    /// Arguments following the executable on every simulator invocation.
    pub simulator_args: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            compiler: "llc".into(),
            merger: "llvm-link".into(),
            linker: "ld.lld".into(),
            simulator: "pasim".into(),
            compiler_args: vec!["-filetype=obj".into()],
            linker_args: vec!["-nostdlib".into(), "-static".into()],
            input_symbol: "input".into(),
            simulator_args: vec!["-V".into(), "-D".into(), "ideal".into()],
        }
    }
}

impl HarnessConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: HarnessConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(index) = self.matrix.groups().iter().position(|group| group.is_empty()) {
            return Err(ConfigError::EmptyGroup { index });
        }
        let required = [
            ("single-path-flag", &self.single_path_flag),
            ("tools.compiler", &self.tools.compiler),
            ("tools.merger", &self.tools.merger),
            ("tools.linker", &self.tools.linker),
            ("tools.simulator", &self.tools.simulator),
            ("tools.input-symbol", &self.tools.input_symbol),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField { field });
            }
        }
        Ok(())
    }
}
