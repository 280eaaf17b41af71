//! Unified error types for the DSG crates
//!
//! [`DsgError`] covers loading, validating and deriving views from the
//! solar dataset. Edge crates (CLI, server) wrap it in `anyhow` with context.
//!
//! # Example
//!
//! ```ignore
//! use dsg_core::{DsgError, DsgResult};
//!
//! fn refresh(dataset: &Dataset, controls: &Controls) -> DsgResult<Views> {
//!     controls.validate()?;
//!     Views::derive(dataset, controls)
//! }
//! ```

use thiserror::Error;

/// Unified error type for all DSG operations.
#[derive(Error, Debug)]
pub enum DsgError {
    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A station filter matched none of the stations in the dataset
    #[error("no station name contains '{0}'")]
    UnknownStation(String),

    /// A control value outside its slider range
    #[error("{control} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        control: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Convenience type alias for Results using DsgError.
pub type DsgResult<T> = Result<T, DsgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_the_control() {
        let err = DsgError::OutOfRange {
            control: "efficiency",
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        let text = err.to_string();
        assert!(text.contains("efficiency"));
        assert!(text.contains("1.5"));
    }

    #[test]
    fn parse_error_keeps_location() {
        let err = DsgError::Parse("line 7: unrecognised timestamp 'noon'".into());
        assert_eq!(
            err.to_string(),
            "Parse error: line 7: unrecognised timestamp 'noon'"
        );
    }

    #[test]
    fn question_mark_propagates() {
        fn inner() -> DsgResult<()> {
            Err(DsgError::UnknownStation("Oamaru".into()))
        }

        fn outer() -> DsgResult<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert!(err.to_string().contains("Oamaru"));
    }
}
