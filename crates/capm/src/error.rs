//! Error types for return and risk analytics.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, CapmError>;

/// Errors that can occur while aligning series or estimating beta and CAPM returns.
#[derive(Debug, Error)]
pub enum CapmError {
    /// No date is shared by every input series
    #[error("Empty intersection: no date is common to all input series")]
    EmptyIntersection,

    /// A zero base price would make a ratio undefined
    #[error("Division by zero: column {column} has a zero price on {date}")]
    DivisionByZero {
        /// Column holding the zero price
        column: String,
        /// Date of the zero price
        date: NaiveDate,
    },

    /// Regression input without variance in the regressor
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Too few aligned observations
    #[error("Insufficient data: need {required} observations, got {available}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Available number of observations
        available: usize,
    },

    /// Missing required column in a table or frame
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Malformed price series
    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    /// Rejected analysis configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
