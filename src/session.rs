// gridmark/src/session.rs

use crate::annotations::{Annotation, AnnotationStore};
use crate::export::{Decoded, Decoder, Encoder, ExportError, LoadError, MatchTolerance};
use crate::globals::GlobalParameters;
use crate::grid::{apply, Cell, GridConfig, GridError, GridState};
use crate::summary::Summary;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of restoring a saved session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportReport {
    pub restored: usize,
    pub skipped: usize,
    /// A split grid was requested but the x axis was too short for it.
    pub split_fallback: bool,
}

/// The grid model and its notes, driven by a presentation layer.
///
/// Every operation is destructive and unconditional: confirming with the operator before
/// regenerating the grid or clearing notes is the caller's job. Failed operations leave the
/// session as it was.
#[derive(Clone, Debug)]
pub struct Session {
    config: GridConfig,
    globals: GlobalParameters,
    grid: GridState,
    annotations: AnnotationStore,
    tolerance: MatchTolerance,
}

impl Session {
    pub fn new(config: GridConfig, globals: GlobalParameters) -> Result<Self, GridError> {
        let grid = apply(&config.grid_spec())?;
        Ok(Self {
            config,
            globals,
            grid,
            annotations: AnnotationStore::new(),
            tolerance: MatchTolerance::default(),
        })
    }

    pub fn with_tolerance(mut self, tolerance: MatchTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Regenerates the grid from `config`. All notes are discarded on success.
    pub fn apply_grid_spec(&mut self, config: GridConfig) -> Result<&GridState, GridError> {
        let grid = apply(&config.grid_spec())?;
        if !self.annotations.is_empty() {
            info!(
                "Discarding {} note(s) after grid regeneration",
                self.annotations.len()
            );
        }
        self.config = config;
        self.grid = grid;
        self.annotations.clear_all();
        Ok(&self.grid)
    }

    /// Sets or, for blank text, clears the note of a cell. Returns false when the cell is not
    /// part of the current grid.
    pub fn set_annotation(&mut self, cell: Cell, text: &str) -> bool {
        if !self.grid.contains(cell) {
            warn!("Ignoring note for {:?}: cell is outside the current grid", cell);
            return false;
        }
        self.annotations.set(cell, text);
        true
    }

    pub fn clear_annotation(&mut self, cell: Cell) {
        self.annotations.clear(cell);
    }

    pub fn clear_all(&mut self) {
        self.annotations.clear_all();
    }

    pub fn export_state(&self) -> Result<String, ExportError> {
        self.export_state_with(&Encoder::new())
    }

    pub fn export_state_with(&self, encoder: &Encoder) -> Result<String, ExportError> {
        encoder.encode(&self.config, &self.grid, &self.annotations, &self.globals)
    }

    /// Replaces the whole session with the one encoded in `text`. Settings the text does not
    /// mention keep their current values.
    pub fn import_state(&mut self, text: &str) -> Result<ImportReport, LoadError> {
        let decoded = self.decoder().decode(text)?;
        Ok(self.replace_with(decoded))
    }

    /// Writes the exported session to `path`, replacing the file only once the whole text
    /// has been written.
    pub fn save(&self, path: &Path) -> Result<usize, ExportError> {
        let text = self.export_state()?;
        let tmp_path = Self::temporary_path(path);
        if let Err(e) = fs::write(&tmp_path, &text) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        info!(
            "Exported {} notes to {}",
            self.annotations.len(),
            path.display()
        );
        Ok(self.annotations.len())
    }

    pub fn load(&mut self, path: &Path) -> Result<ImportReport, LoadError> {
        let decoded = self.decoder().read_from_file(path)?;
        Ok(self.replace_with(decoded))
    }

    fn decoder(&self) -> Decoder {
        Decoder::new(self.config.clone(), self.globals.clone()).tolerance(self.tolerance)
    }

    fn replace_with(&mut self, decoded: Decoded) -> ImportReport {
        let report = ImportReport {
            restored: decoded.restored,
            skipped: decoded.skipped,
            split_fallback: decoded.grid.split_fallback(),
        };
        self.config = decoded.config;
        self.globals = decoded.globals;
        self.grid = decoded.grid;
        self.annotations = decoded.annotations;
        report
    }

    fn temporary_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn globals(&self) -> &GlobalParameters {
        &self.globals
    }

    /// Global settings can change without regenerating the grid.
    pub fn globals_mut(&mut self) -> &mut GlobalParameters {
        &mut self.globals
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn x_values(&self) -> &[String] {
        self.grid.x_values()
    }

    pub fn y_values(&self) -> &[String] {
        self.grid.y_values()
    }

    pub fn annotation(&self, cell: Cell) -> Option<&str> {
        self.annotations.get(cell)
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.annotations.all()
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary::new(self)
    }
}

impl Default for Session {
    fn default() -> Self {
        let config = GridConfig::default();
        // the default axes are distinct, so applying them cannot conflict
        let grid = apply(&config.grid_spec()).unwrap_or_else(|e| unreachable!("{}", e));
        Self {
            config,
            globals: GlobalParameters::default(),
            grid,
            annotations: AnnotationStore::new(),
            tolerance: MatchTolerance::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfigBuilder;
    use crate::parameter::Parameter;

    fn split_session() -> Session {
        let config = GridConfigBuilder::default().split(true).build().unwrap();
        Session::new(config, GlobalParameters::untitled()).unwrap()
    }

    #[test]
    fn test_gold_round_trip() {
        crate::setup_pretty_env_logger();
        let mut session = split_session();
        assert!(session.set_annotation(Cell::new(1, 2, 5), "gold"));
        let text = session.export_state().unwrap();

        let mut fresh = split_session();
        let report = fresh.import_state(&text).unwrap();
        assert_eq!(report.restored, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(
            fresh.annotations(),
            vec![Annotation {
                cell: Cell::new(1, 2, 5),
                text: "gold".to_string(),
            }]
        );
    }

    #[test]
    fn test_regeneration_discards_notes() {
        let mut session = Session::default();
        session.set_annotation(Cell::new(0, 0, 0), "a");
        let config = GridConfigBuilder::default()
            .x_axis(Parameter::Power)
            .build()
            .unwrap();
        session.apply_grid_spec(config).unwrap();
        assert_eq!(session.annotation_count(), 0);
        assert_eq!(session.grid().x_parameter(), Parameter::Power);
    }

    #[test]
    fn test_failed_apply_keeps_state() {
        let mut session = Session::default();
        session.set_annotation(Cell::new(0, 3, 4), "keep");
        let before = session.grid().clone();
        let conflict = GridConfigBuilder::default()
            .x_axis(Parameter::Frequency)
            .y_axis(Parameter::Frequency)
            .build()
            .unwrap();
        assert_eq!(
            session.apply_grid_spec(conflict).unwrap_err(),
            GridError::AxisConflict(Parameter::Frequency)
        );
        assert_eq!(session.grid(), &before);
        assert_eq!(session.annotation(Cell::new(0, 3, 4)), Some("keep"));
        assert_eq!(session.config(), &GridConfig::default());
    }

    #[test]
    fn test_cells_outside_grid_are_rejected() {
        let mut session = Session::default();
        assert!(!session.set_annotation(Cell::new(1, 0, 0), "split tab"));
        assert!(!session.set_annotation(Cell::new(0, 20, 0), "too low"));
        assert_eq!(session.annotation_count(), 0);
    }

    #[test]
    fn test_cleared_note_is_not_exported() {
        let mut session = Session::default();
        session.set_annotation(Cell::new(0, 1, 1), "one");
        session.set_annotation(Cell::new(0, 2, 2), "two");
        session.clear_annotation(Cell::new(0, 1, 1));
        let text = session.export_state().unwrap();
        assert!(!text.contains("\none|"));
        assert!(text.contains("\ntwo|"));

        session.set_annotation(Cell::new(0, 2, 2), "");
        assert!(matches!(
            session.export_state(),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn test_failed_import_keeps_state() {
        let mut session = Session::default();
        session.set_annotation(Cell::new(0, 0, 0), "keep");
        let result = session.import_state("# X_Axis: Speed\n# Y_Axis: Speed\n");
        assert!(result.is_err());
        assert_eq!(session.annotation(Cell::new(0, 0, 0)), Some("keep"));
        assert_eq!(session.grid().x_parameter(), Parameter::QPulse);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("laser_test_walnut.csv");

        let mut session = split_session();
        session.globals_mut().set_title("Walnut");
        session.set_annotation(Cell::new(2, 19, 9), "corner");
        session.set_annotation(Cell::new(1, 0, 0), "origin");
        assert_eq!(session.save(&path).unwrap(), 2);
        assert!(!dir.path().join("laser_test_walnut.csv.tmp").exists());

        let mut restored = Session::default();
        let report = restored.load(&path).unwrap();
        assert_eq!(report.restored, 2);
        assert_eq!(restored.annotations(), session.annotations());
        assert_eq!(restored.globals().title(), "Walnut");
        assert_eq!(restored.config(), session.config());
    }

    #[test]
    fn test_load_missing_file_keeps_state() {
        let mut session = Session::default();
        session.set_annotation(Cell::new(0, 0, 0), "keep");
        let result = session.load(Path::new("/nonexistent/laser_test.csv"));
        assert!(matches!(result, Err(LoadError::IoError(_))));
        assert_eq!(session.annotation_count(), 1);
    }
}
