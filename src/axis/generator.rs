// gridmark/src/axis/generator.rs

use super::errors::RangeParseError;
use super::range::AxisRange;
use crate::parameter::{FormatClass, Parameter};
use log::trace;
use ndarray::Array1;

/// Fewest samples an axis can have.
pub const MIN_COUNT: usize = 2;
/// Most samples an axis can have.
pub const MAX_COUNT: usize = 1000;

/// Ordered, formatted sample values of one axis.
pub type ValueSequence = Vec<String>;

/// A range together with how many samples to take from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSpec {
    pub range: AxisRange,
    pub count: usize,
}

impl AxisSpec {
    pub fn new(range: AxisRange, count: usize) -> Self {
        Self { range, count }
    }

    pub fn parameter(&self) -> Parameter {
        self.range.parameter
    }

    pub fn generate(&self) -> Result<ValueSequence, RangeParseError> {
        generate(self.parameter(), self.range.start, self.range.end, self.count)
    }
}

/// Samples `count` evenly spaced values from `start` to `end` inclusive, rendered with the
/// formatting class of `parameter`.
pub fn generate(
    parameter: Parameter,
    start: f64,
    end: f64,
    count: usize,
) -> Result<ValueSequence, RangeParseError> {
    let range = AxisRange::new(parameter, start, end)?;
    let values = generate_formatted(parameter.format_class(), range.start, range.end, count)?;
    trace!(
        "Generated {} values for {} from {} to {}",
        values.len(),
        parameter,
        start,
        end
    );
    Ok(values)
}

pub fn generate_formatted(
    class: FormatClass,
    start: f64,
    end: f64,
    count: usize,
) -> Result<ValueSequence, RangeParseError> {
    if !(MIN_COUNT..=MAX_COUNT).contains(&count) {
        return Err(RangeParseError::InvalidCount(count));
    }
    if start == end {
        return Ok(vec![class.format(start); count]);
    }
    Ok(Array1::linspace(start, end, count)
        .iter()
        .map(|&value| class.format(value))
        .collect())
}

/// Parses a sample count typed by an operator or read from a file. Counts below
/// [`MIN_COUNT`] are raised to it, counts above [`MAX_COUNT`] are rejected.
pub fn parse_count(text: &str) -> Result<usize, RangeParseError> {
    let count = text
        .trim()
        .parse::<i64>()
        .map_err(|_| RangeParseError::InvalidCountText(text.to_string()))?;
    let count = usize::try_from(count).unwrap_or(0).max(MIN_COUNT);
    if count > MAX_COUNT {
        return Err(RangeParseError::InvalidCount(count));
    }
    Ok(count)
}
