//! Canonical statistics: the comparable form of a simulator report.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// One line of canonical statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StatEntry {
    /// Fetch count of one instruction, summed over both fetch columns.
    Fetch { instruction: String, count: u64 },
    /// Total cycle count of the run.
    Cycles { label: String, count: String },
    /// Number of invocations of one function.
    Calls { function: String, count: String },
}

impl fmt::Display for StatEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatEntry::Fetch { instruction, count } => write!(f, "{instruction} {count}"),
            StatEntry::Cycles { label, count } => write!(f, "{label} {count}"),
            StatEntry::Calls { function, count } => write!(f, "{function}(): {count}"),
        }
    }
}

/// Normalized statistics of one execution.
///
/// Entries keep the order in which the raw report listed them: fetch counts,
/// then the cycle count, then call counts. Nothing is sorted.
///
/// Equality is textual: two values are equal iff [`CanonicalStats::text`]
/// yields identical strings.
#[derive(Debug, Clone, Default)]
pub struct CanonicalStats {
    entries: Vec<StatEntry>,
}

impl CanonicalStats {
    pub fn new(entries: Vec<StatEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[StatEntry] {
        &self.entries
    }

    /// The canonical text, one newline-terminated line per entry.
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Summed fetch count of the named instruction, if listed.
    pub fn fetch_count(&self, instruction: &str) -> Option<u64> {
        self.entries.iter().find_map(|e| match e {
            StatEntry::Fetch {
                instruction: name,
                count,
            } if name == instruction => Some(*count),
            _ => None,
        })
    }

    /// The cycle count token, if the report had one.
    pub fn cycles(&self) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            StatEntry::Cycles { count, .. } => Some(count.as_str()),
            _ => None,
        })
    }

    /// Invocation count of the named function, if profiled.
    pub fn calls(&self, function: &str) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            StatEntry::Calls {
                function: name,
                count,
            } if name == function => Some(count.as_str()),
            _ => None,
        })
    }

    /// SHA-256 of the canonical text, as lowercase hex.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text().as_bytes());
        let digest: [u8; 32] = hasher.finalize().into();
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for CanonicalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl PartialEq for CanonicalStats {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
    }
}

impl Eq for CanonicalStats {}
