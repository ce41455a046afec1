// gridmark/src/grid/mod.rs

mod config;
mod errors;
mod grid_spec;
mod grid_state;

pub use config::{GridConfig, GridConfigBuilder, GridConfigBuilderError, DEFAULT_X_COUNT, DEFAULT_Y_COUNT};
pub use errors::GridError;
pub use grid_spec::GridSpec;
pub use grid_state::{apply, Cell, GridState, Tab, MIN_SPLIT_VALUES};
