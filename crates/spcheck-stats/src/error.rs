//! Error types for statistics normalization.

/// Errors that can occur while normalizing a raw statistics report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// The text is not a statistics report at all (usually an error message
    /// or the simulator's option summary).
    #[error("malformed statistics report: {reason}")]
    MalformedReport {
        /// What was found instead of the statistics section.
        reason: String,
    },

    /// The report ended before an expected marker or row.
    #[error("truncated statistics report: expected {expected}")]
    TruncatedReport {
        /// The marker or row that was expected next.
        expected: &'static str,
    },

    /// A count column could not be read as an integer.
    #[error("invalid count on line {line}: '{text}'")]
    InvalidCount {
        /// 1-based line number in the raw report.
        line: usize,
        /// The offending text.
        text: String,
    },

    /// A row has fewer whitespace-separated fields than required.
    #[error("line {line} has no field at index {index}")]
    MissingField {
        /// 1-based line number in the raw report.
        line: usize,
        /// 0-based field index that was required.
        index: usize,
    },
}

/// Result type for statistics operations.
pub type Result<T> = std::result::Result<T, StatsError>;
