// gridmark/src/grid/config.rs

use super::grid_spec::GridSpec;
use crate::axis::{AxisRange, AxisSpec, RangeTable, MAX_COUNT, MIN_COUNT};
use crate::parameter::Parameter;
use derive_builder::Builder;

pub const DEFAULT_X_COUNT: usize = 20;
pub const DEFAULT_Y_COUNT: usize = 20;

/// Operator-editable grid settings: which parameters are the axes, how densely each is sampled,
/// whether to split, and the range typed for every parameter.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct GridConfig {
    pub x_axis: Parameter,
    pub y_axis: Parameter,
    pub x_count: usize,
    pub y_count: usize,
    pub split: bool,
    pub ranges: RangeTable,
}

impl GridConfig {
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::new(
            AxisSpec::new(self.ranges.get(self.x_axis), self.x_count),
            AxisSpec::new(self.ranges.get(self.y_axis), self.y_count),
            self.split,
        )
    }

    pub fn is_axis(&self, parameter: Parameter) -> bool {
        parameter == self.x_axis || parameter == self.y_axis
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_axis: Parameter::QPulse,
            y_axis: Parameter::Frequency,
            x_count: DEFAULT_X_COUNT,
            y_count: DEFAULT_Y_COUNT,
            split: false,
            ranges: RangeTable::default(),
        }
    }
}

impl GridConfigBuilder {
    /// Overrides the range of a single parameter, keeping the defaults for the others.
    pub fn range(&mut self, range: AxisRange) -> &mut Self {
        self.ranges
            .get_or_insert_with(RangeTable::default)
            .set(range);
        self
    }

    fn validate(&self) -> Result<(), String> {
        for (name, count) in [("x_count", self.x_count), ("y_count", self.y_count)] {
            if let Some(count) = count {
                if !(MIN_COUNT..=MAX_COUNT).contains(&count) {
                    return Err(format!(
                        "{} must be between {} and {}, but got {}",
                        name, MIN_COUNT, MAX_COUNT, count
                    ));
                }
            }
        }
        Ok(())
    }
}
