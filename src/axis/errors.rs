// gridmark/src/axis/errors.rs

use crate::parameter::Parameter;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeParseError {
    #[error("Invalid range for {parameter}: {field} value {value:?} is not a number")]
    InvalidNumber {
        parameter: Parameter,
        field: &'static str,
        value: String,
    },
    #[error("Invalid range for {parameter}: {field} must be finite, but got {value}")]
    NonFinite {
        parameter: Parameter,
        field: &'static str,
        value: f64,
    },
    #[error("Invalid sample count {0:?}: expected an integer")]
    InvalidCountText(String),
    #[error("Sample count must be between 2 and 1000, but got {0}")]
    InvalidCount(usize),
}
