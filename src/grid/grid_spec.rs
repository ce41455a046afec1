// gridmark/src/grid/grid_spec.rs

use crate::axis::AxisSpec;

/// The two sampled axes of a grid and whether the x axis is split across two tabs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub split: bool,
}

impl GridSpec {
    pub fn new(x_axis: AxisSpec, y_axis: AxisSpec, split: bool) -> Self {
        Self {
            x_axis,
            y_axis,
            split,
        }
    }
}
