//! Parser from raw simulator statistics to [`CanonicalStats`].
//!
//! The raw report is line-positioned: section markers are found by scanning,
//! and rows are read relative to them. Every scan is bounded by the end of the
//! input and fails with a [`StatsError`] naming what it was looking for.

use crate::canonical::{CanonicalStats, StatEntry};
use crate::error::{Result, StatsError};

/// Header line of the instruction statistics table.
pub const INSTRUCTION_HEADER: &str = "Instruction Statistics:";
/// Header the simulator prints when it was invoked with bad options.
pub const OPTIONS_HEADER: &str = "Pasim options:";
/// Prefix of the totals row closing the instruction table.
pub const TOTALS_PREFIX: &str = "all:";
/// Prefix of the cycle count line.
pub const CYCLES_PREFIX: &str = "Cycles:";
/// Header line of the per-function profiling table.
pub const PROFILING_HEADER: &str = "Profiling information:";

/// Table header rows following the profiling header.
const PROFILING_HEADER_ROWS: usize = 3;
/// Fetch count columns summed per instruction.
const FETCH_COLUMNS: [usize; 2] = [1, 4];

/// Normalize one raw statistics report.
///
/// Emits, in report order: one `"<instruction> <fetches>"` line per
/// instruction row, the `"Cycles: <n>"` line, and one `"<function>(): <calls>"`
/// line per profiled function.
pub fn normalize(raw: &str) -> Result<CanonicalStats> {
    let mut cursor = LineCursor::new(raw);
    let mut entries = Vec::new();

    // Instruction fetch counts
    seek_instruction_header(&mut cursor)?;
    // column header row
    cursor.skip(1);
    loop {
        let (number, line) = cursor.next_line().ok_or(StatsError::TruncatedReport {
            expected: "instruction totals row (\"all:\")",
        })?;
        if line.trim().starts_with(TOTALS_PREFIX) {
            break;
        }
        entries.push(parse_fetch_row(number, line)?);
    }

    // Cycle count
    let (number, line) = cursor.find_prefix(CYCLES_PREFIX, "cycle count (\"Cycles:\")")?;
    let mut fields = line.split_whitespace();
    let label = fields.next().ok_or(StatsError::MissingField {
        line: number,
        index: 0,
    })?;
    let count = fields.next().ok_or(StatsError::MissingField {
        line: number,
        index: 1,
    })?;
    entries.push(StatEntry::Cycles {
        label: label.to_string(),
        count: count.to_string(),
    });

    // Function call counts
    cursor.find_prefix(
        PROFILING_HEADER,
        "profiling section (\"Profiling information:\")",
    )?;
    for _ in 0..PROFILING_HEADER_ROWS {
        cursor.next_line().ok_or(StatsError::TruncatedReport {
            expected: "profiling table header",
        })?;
    }
    while let Some((_, line)) = cursor.next_line() {
        let Some(rest) = line.trim().strip_prefix('<') else {
            break;
        };
        let function = rest.split('>').next().unwrap_or(rest);
        cursor.next_line().ok_or(StatsError::TruncatedReport {
            expected: "function profile row",
        })?;
        let (number, count_line) = cursor.next_line().ok_or(StatsError::TruncatedReport {
            expected: "function invocation count",
        })?;
        let count = count_line
            .split_whitespace()
            .next()
            .ok_or(StatsError::MissingField {
                line: number,
                index: 0,
            })?;
        entries.push(StatEntry::Calls {
            function: function.to_string(),
            count: count.to_string(),
        });
    }

    Ok(CanonicalStats::new(entries))
}

fn seek_instruction_header(cursor: &mut LineCursor<'_>) -> Result<()> {
    loop {
        let (_, line) = cursor.next_line().ok_or_else(|| StatsError::MalformedReport {
            reason: format!("no '{INSTRUCTION_HEADER}' section"),
        })?;
        match line.trim() {
            INSTRUCTION_HEADER => return Ok(()),
            OPTIONS_HEADER => {
                return Err(StatsError::MalformedReport {
                    reason: format!("found '{OPTIONS_HEADER}' before any statistics"),
                })
            }
            _ => {}
        }
    }
}

fn parse_fetch_row(number: usize, line: &str) -> Result<StatEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let instruction = fields.first().ok_or(StatsError::MissingField {
        line: number,
        index: 0,
    })?;

    let mut count: u64 = 0;
    for index in FETCH_COLUMNS {
        let text = fields.get(index).ok_or(StatsError::MissingField {
            line: number,
            index,
        })?;
        let value: u64 = text.parse().map_err(|_| StatsError::InvalidCount {
            line: number,
            text: (*text).to_string(),
        })?;
        count = count.checked_add(value).ok_or(StatsError::InvalidCount {
            line: number,
            text: line.trim().to_string(),
        })?;
    }

    Ok(StatEntry::Fetch {
        instruction: (*instruction).to_string(),
        count,
    })
}

/// Forward-only cursor over the lines of a report, tracking 1-based line numbers.
struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.get(self.pos).copied()?;
        self.pos += 1;
        Some((self.pos, line))
    }

    fn skip(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.lines.len());
    }

    /// Consume lines up to and including the first whose trimmed text starts
    /// with `prefix`.
    fn find_prefix(&mut self, prefix: &str, expected: &'static str) -> Result<(usize, &'a str)> {
        while let Some((number, line)) = self.next_line() {
            if line.trim().starts_with(prefix) {
                return Ok((number, line));
            }
        }
        Err(StatsError::TruncatedReport { expected })
    }
}
