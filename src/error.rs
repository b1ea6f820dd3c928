//! Error types for schedule parsing, registration and evaluation.

use thiserror::Error;

/// Errors raised while parsing schedules, registering jobs or computing
/// next run times.
#[derive(Debug, Error)]
pub enum CronError {
    /// Malformed field expression.
    #[error("invalid schedule syntax: {0}")]
    InvalidSyntax(String),

    /// Field value outside its domain.
    #[error("value {value} out of range, expected {min}..={max}")]
    OutOfRange { value: i64, min: u32, max: u32 },

    /// Empty or unrecognizable callback reference.
    #[error("empty or invalid callback provided")]
    InvalidCallback,

    /// Registration with an id that is already in use.
    #[error("job id already in use: {0}")]
    DuplicateJob(String),

    /// The evaluator exhausted its search bound without finding a match.
    ///
    /// Legitimate schedules always admit a next occurrence, even rare ones
    /// like leap-day-only patterns; hitting this is an invariant violation.
    #[error("no matching run time found: {0}")]
    NoSolution(String),
}

/// Result type for cron operations.
pub type CronResult<T> = Result<T, CronError>;
