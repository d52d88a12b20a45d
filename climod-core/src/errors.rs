use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum ClimodError {
    #[error("{0}")]
    Error(String),
    #[error("Could not parse configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Not enough samples for {statistic}. Expected at least {required}, got {found}")]
    InsufficientSamples {
        statistic: &'static str,
        required: usize,
        found: usize,
    },
    #[error("Sample value at index {index} cannot be represented as a float")]
    NonNumericSample { index: usize },
    #[error("Coordinate `{axis}` has length {found} but the data has {expected} entries along that axis")]
    ShapeMismatch {
        axis: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Selection along `{axis}` matched no values")]
    EmptySelection { axis: &'static str },
}

/// Convenience type for `Result<T, ClimodError>`.
pub type ClimodResult<T> = Result<T, ClimodError>;
