// gridmark/src/grid/grid_state.rs

use super::errors::GridError;
use super::grid_spec::GridSpec;
use crate::axis::ValueSequence;
use crate::parameter::Parameter;
use log::{debug, info, warn};

/// A split needs at least this many x values, otherwise a single grid is used.
pub const MIN_SPLIT_VALUES: usize = 4;

/// Coordinate of one grid cell. `col` is local to the tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub tab: usize,
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(tab: usize, row: usize, col: usize) -> Self {
        Self { tab, row, col }
    }
}

/// One displayable sub-grid. Single grids use id 0, split halves use ids 1 and 2.
#[derive(Clone, Debug, PartialEq)]
pub struct Tab {
    pub id: usize,
    pub x_values: ValueSequence,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridState {
    x_parameter: Parameter,
    y_parameter: Parameter,
    x_values: ValueSequence,
    y_values: ValueSequence,
    tabs: Vec<Tab>,
    split_fallback: bool,
}

/// Generates both axes of `spec` and lays them out into tabs.
pub fn apply(spec: &GridSpec) -> Result<GridState, GridError> {
    let x_parameter = spec.x_axis.parameter();
    let y_parameter = spec.y_axis.parameter();
    if x_parameter == y_parameter {
        return Err(GridError::AxisConflict(x_parameter));
    }
    let x_values = spec.x_axis.generate()?;
    let y_values = spec.y_axis.generate()?;
    debug!(
        "Generated {} {} values and {} {} values",
        x_values.len(),
        x_parameter,
        y_values.len(),
        y_parameter
    );

    let mut split_fallback = false;
    let tabs = if spec.split {
        if x_values.len() < MIN_SPLIT_VALUES {
            warn!(
                "Too few {} values to split ({} < {}), using a single grid",
                x_parameter,
                x_values.len(),
                MIN_SPLIT_VALUES
            );
            split_fallback = true;
            GridState::single_tab(&x_values)
        } else {
            GridState::split_tabs(&x_values)
        }
    } else {
        GridState::single_tab(&x_values)
    };
    info!(
        "Applied grid {} (Y) vs {} (X) with {} tab(s)",
        y_parameter,
        x_parameter,
        tabs.len()
    );

    Ok(GridState {
        x_parameter,
        y_parameter,
        x_values,
        y_values,
        tabs,
        split_fallback,
    })
}

impl GridState {
    fn single_tab(x_values: &[String]) -> Vec<Tab> {
        vec![Tab {
            id: 0,
            x_values: x_values.to_vec(),
        }]
    }

    fn split_tabs(x_values: &[String]) -> Vec<Tab> {
        let mid = x_values.len().div_ceil(2);
        let (first, second) = x_values.split_at(mid);
        vec![
            Tab {
                id: 1,
                x_values: first.to_vec(),
            },
            Tab {
                id: 2,
                x_values: second.to_vec(),
            },
        ]
    }

    pub fn x_parameter(&self) -> Parameter {
        self.x_parameter
    }

    pub fn y_parameter(&self) -> Parameter {
        self.y_parameter
    }

    /// The full, unsplit x sequence.
    pub fn x_values(&self) -> &[String] {
        &self.x_values
    }

    pub fn y_values(&self) -> &[String] {
        &self.y_values
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, id: usize) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn is_split(&self) -> bool {
        self.tabs.len() > 1
    }

    /// True when a split was requested but the x axis was too short for it.
    pub fn split_fallback(&self) -> bool {
        self.split_fallback
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.x_value(cell).is_some() && cell.row < self.y_values.len()
    }

    pub fn x_value(&self, cell: Cell) -> Option<&str> {
        self.tab(cell.tab)?
            .x_values
            .get(cell.col)
            .map(String::as_str)
    }

    pub fn y_value(&self, cell: Cell) -> Option<&str> {
        self.y_values.get(cell.row).map(String::as_str)
    }

    /// Number of cells across all tabs.
    pub fn cell_count(&self) -> usize {
        self.x_values.len() * self.y_values.len()
    }
}
