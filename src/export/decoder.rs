// gridmark/src/export/decoder.rs

use super::errors::LoadError;
use super::format::{self, COMMENT_PREFIX, DELIMITER};
use super::matching::MatchTolerance;
use crate::annotations::AnnotationStore;
use crate::axis::{parse_count, AxisRange};
use crate::globals::GlobalParameters;
use crate::grid::{apply, Cell, GridConfig, GridSpec, GridState};
use crate::parameter::Parameter;
use humantime::format_duration;
use log::{debug, info, trace, warn};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Everything restored from a file, anchored against a freshly applied grid.
#[derive(Clone, Debug)]
pub struct Decoded {
    pub config: GridConfig,
    pub globals: GlobalParameters,
    pub grid: GridState,
    pub annotations: AnnotationStore,
    /// Data rows turned into notes.
    pub restored: usize,
    /// Data rows that could not be placed on the grid.
    pub skipped: usize,
}

impl Decoded {
    pub fn grid_spec(&self) -> GridSpec {
        self.config.grid_spec()
    }
}

/// Reads exported sessions. Settings missing from a file keep the values of `base_config`
/// and `base_globals`.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    base_config: GridConfig,
    base_globals: GlobalParameters,
    tolerance: MatchTolerance,
}

pub fn decode(text: &str) -> Result<Decoded, LoadError> {
    Decoder::default().decode(text)
}

impl Decoder {
    pub fn new(base_config: GridConfig, base_globals: GlobalParameters) -> Self {
        Self {
            base_config,
            base_globals,
            tolerance: MatchTolerance::default(),
        }
    }

    pub fn tolerance(mut self, tolerance: MatchTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn read_from_file(&self, path: &Path) -> Result<Decoded, LoadError> {
        info!("Loading grid notes from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        self.decode(&text)
    }

    pub fn decode(&self, text: &str) -> Result<Decoded, LoadError> {
        let now = Instant::now();
        let (metadata, body) = Self::split_sections(text);
        debug!(
            "Found {} metadata entries and {} body lines",
            metadata.len(),
            body.len()
        );

        let (config, globals) = self.apply_metadata(&metadata)?;
        let grid = apply(&config.grid_spec())?;

        let mut annotations = AnnotationStore::new();
        let (restored, skipped) = if body.is_empty() {
            info!("No data rows found, restored metadata only");
            (0, 0)
        } else {
            self.restore_rows(&body.join("\n"), &grid, &mut annotations)?
        };
        if skipped > 0 {
            warn!("{} row(s) could not be placed on the grid and were skipped", skipped);
        }
        info!(
            "Loaded {} notes in {}",
            restored,
            format_duration(now.elapsed())
        );

        Ok(Decoded {
            config,
            globals,
            grid,
            annotations,
            restored,
            skipped,
        })
    }

    /// Comment lines before the table header are metadata; from the header on, every
    /// non-blank line belongs to the table.
    fn split_sections(text: &str) -> (Vec<(&str, &str)>, Vec<&str>) {
        let mut metadata = Vec::new();
        let mut body = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if body.is_empty() && line.trim_start().starts_with(COMMENT_PREFIX) {
                if let Some(entry) = format::split_metadata_line(line) {
                    metadata.push(entry);
                }
                continue;
            }
            body.push(line);
        }
        (metadata, body)
    }

    fn apply_metadata(
        &self,
        metadata: &[(&str, &str)],
    ) -> Result<(GridConfig, GlobalParameters), LoadError> {
        let mut config = self.base_config.clone();
        let mut globals = self.base_globals.clone();
        for &(key, value) in metadata {
            match key {
                format::KEY_X_AXIS => config.x_axis = Self::parse_axis(key, value)?,
                format::KEY_Y_AXIS => config.y_axis = Self::parse_axis(key, value)?,
                format::KEY_MODE => config.split = format::parse_mode(value),
                format::KEY_X_COUNTS => config.x_count = Self::parse_count(key, value)?,
                format::KEY_Y_COUNTS => config.y_count = Self::parse_count(key, value)?,
                _ if format::is_bookkeeping_key(key) => trace!("Ignoring metadata {:?}", key),
                _ => match Self::parse_range_key(key) {
                    Some((parameter, field)) => {
                        let current = config.ranges.get(parameter);
                        let bound = AxisRange::parse_bound(parameter, field, value)
                            .map_err(|source| LoadError::InvalidRange {
                                key: key.to_string(),
                                source,
                            })?;
                        let (start, end) = match field {
                            "start" => (bound, current.end),
                            _ => (current.start, bound),
                        };
                        let range = AxisRange::new(parameter, start, end).map_err(|source| {
                            LoadError::InvalidRange {
                                key: key.to_string(),
                                source,
                            }
                        })?;
                        config.ranges.set(range);
                    }
                    None => {
                        if let Err(e) = globals.set_named(key, value) {
                            warn!("Ignoring metadata line: {}", e);
                        }
                    }
                },
            }
        }
        Ok((config, globals))
    }

    fn parse_axis(key: &str, value: &str) -> Result<Parameter, LoadError> {
        value.parse().map_err(|source| LoadError::InvalidAxis {
            key: key.to_string(),
            source,
        })
    }

    fn parse_count(key: &str, value: &str) -> Result<usize, LoadError> {
        parse_count(value).map_err(|source| LoadError::InvalidRange {
            key: key.to_string(),
            source,
        })
    }

    fn parse_range_key(key: &str) -> Option<(Parameter, &'static str)> {
        if let Some(name) = key.strip_suffix("_start") {
            return name.parse().ok().map(|p| (p, "start"));
        }
        if let Some(name) = key.strip_suffix("_end") {
            return name.parse().ok().map(|p| (p, "end"));
        }
        None
    }

    fn restore_rows(
        &self,
        body: &str,
        grid: &GridState,
        annotations: &mut AnnotationStore,
    ) -> Result<(usize, usize), LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .flexible(true)
            .from_reader(body.as_bytes());
        let columns: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();

        let mut restored = 0;
        let mut skipped = 0;
        for (line, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    debug!("Skipping unreadable row {}: {}", line + 1, e);
                    skipped += 1;
                    continue;
                }
            };
            match self.locate_row(&columns, &record, grid, annotations) {
                Some((cell, note)) => {
                    annotations.set(cell, note);
                    restored += 1;
                }
                None => {
                    debug!("Row {} does not match the current grid", line + 1);
                    skipped += 1;
                }
            }
        }
        Ok((restored, skipped))
    }

    fn locate_row<'r>(
        &self,
        columns: &HashMap<String, usize>,
        record: &'r csv::StringRecord,
        grid: &GridState,
        annotations: &AnnotationStore,
    ) -> Option<(Cell, &'r str)> {
        let field = |name: &str| {
            columns
                .get(name)
                .and_then(|&i| record.get(i))
                .map(str::trim)
        };

        let x_parameter: Parameter = field(format::COL_X_PARAM)?.parse().ok()?;
        let y_parameter: Parameter = field(format::COL_Y_PARAM)?.parse().ok()?;
        if x_parameter != grid.x_parameter() || y_parameter != grid.y_parameter() {
            trace!(
                "Row axes {} / {} differ from grid axes {} / {}",
                x_parameter,
                y_parameter,
                grid.x_parameter(),
                grid.y_parameter()
            );
            return None;
        }
        let note = field(format::COL_NOTE).filter(|note| !note.is_empty())?;
        let tab_id = match field(format::COL_TAB) {
            Some(tab) => tab.parse::<usize>().ok()?,
            None => 0,
        };

        let tab = grid.tab(tab_id)?;
        let cols = self
            .tolerance
            .positions(field(format::COL_X_VALUE)?, &tab.x_values);
        let rows = self
            .tolerance
            .positions(field(format::COL_Y_VALUE)?, grid.y_values());
        // repeated axis values share a rendering, so take the first cell this file left free
        let cell = rows
            .iter()
            .flat_map(|&row| cols.iter().map(move |&col| Cell::new(tab.id, row, col)))
            .find(|&cell| annotations.get(cell).is_none());
        if cell.is_none() && !rows.is_empty() && !cols.is_empty() {
            trace!("Every cell matching {:?} already holds a note", note);
        }
        Some((cell?, note))
    }
}
