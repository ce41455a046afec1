// gridmark/src/axis/mod.rs

mod errors;
mod generator;
mod range;

pub use errors::RangeParseError;
pub use generator::{generate, generate_formatted, parse_count, AxisSpec, ValueSequence, MAX_COUNT, MIN_COUNT};
pub use range::{AxisRange, RangeTable};
