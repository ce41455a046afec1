// gridmark/src/grid/errors.rs

use crate::axis::RangeParseError;
use crate::parameter::Parameter;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("X and Y axes cannot be the same parameter ({0})")]
    AxisConflict(Parameter),
    #[error(transparent)]
    RangeParseError(#[from] RangeParseError),
}
