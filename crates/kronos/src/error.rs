//! Error types for kronos operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KronosError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid combination: {0}")]
    InvalidCombination(String),

    #[error("Invalid range: start '{start}' is after end '{end}'")]
    RangeOrder { start: String, end: String },

    #[error("Cannot parse '{input}' with format '{format}': {source}")]
    Parse {
        input: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid format: '{0}'")]
    InvalidFormat(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Splice point '{point}' is outside range ['{start}', '{end}']")]
    SpliceDomain {
        point: String,
        start: String,
        end: String,
    },

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

pub type Result<T> = std::result::Result<T, KronosError>;
