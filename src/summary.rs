// gridmark/src/summary.rs

use crate::session::Session;
use std::fmt;

/// Plain-text report of a session: title, global settings, grid layout and every note.
pub struct Summary<'a> {
    session: &'a Session,
}

impl<'a> Summary<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn fmt_globals(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.session.grid();
        let entries = self
            .session
            .globals()
            .entries_excluding([grid.x_parameter(), grid.y_parameter()]);
        writeln!(f, "Global Parameters:")?;
        // the title already has its own line
        for (key, value) in entries.iter().skip(1) {
            let value = if value.trim().is_empty() {
                "[empty]"
            } else {
                value.as_str()
            };
            writeln!(f, "  {}: {}", key, value)?;
        }
        Ok(())
    }

    fn fmt_grid(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.session.config();
        let grid = self.session.grid();
        writeln!(
            f,
            "Grid: {} (Y) vs {} (X)",
            grid.y_parameter(),
            grid.x_parameter()
        )?;
        let mode = if grid.is_split() {
            format!("Split ({} tabs)", grid.tabs().len())
        } else if grid.split_fallback() {
            "Single (too few values to split)".to_string()
        } else {
            "Single".to_string()
        };
        writeln!(f, "  Mode: {}", mode)?;
        writeln!(
            f,
            "  X counts: {} -> {} values",
            config.x_count,
            grid.x_values().len()
        )?;
        writeln!(
            f,
            "  Y counts: {} -> {} values",
            config.y_count,
            grid.y_values().len()
        )
    }

    fn fmt_notes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notes = self.session.annotations();
        if notes.is_empty() {
            return writeln!(f, "No notes added yet.");
        }
        let grid = self.session.grid();
        writeln!(f, "{} Notes:", notes.len())?;
        for note in notes {
            let prefix = if note.cell.tab > 0 {
                format!("Grid {}: ", note.cell.tab)
            } else {
                String::new()
            };
            writeln!(
                f,
                "  {}{} = {} | {} = {} → {}",
                prefix,
                grid.y_parameter(),
                grid.y_value(note.cell).unwrap_or("?"),
                grid.x_parameter(),
                grid.x_value(note.cell).unwrap_or("?"),
                note.text
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.session.globals().title();
        let title = if title.is_empty() { "[No title]" } else { title };
        writeln!(f, "Title: {}", title)?;
        self.fmt_globals(f)?;
        writeln!(f)?;
        self.fmt_grid(f)?;
        writeln!(f)?;
        self.fmt_notes(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::globals::GlobalParameters;
    use crate::grid::{Cell, GridConfigBuilder};
    use crate::parameter::Parameter;
    use crate::session::Session;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_with_notes() {
        let config = GridConfigBuilder::default()
            .x_axis(Parameter::QPulse)
            .y_axis(Parameter::Frequency)
            .x_count(4)
            .y_count(2)
            .split(true)
            .build()
            .unwrap();
        let mut globals = GlobalParameters::untitled();
        globals.set_title("Walnut");
        globals.set(Parameter::Passes, "");
        let mut session = Session::new(config, globals).unwrap();
        session.set_annotation(Cell::new(2, 1, 0), "crisp");
        session.set_annotation(Cell::new(1, 0, 1), "gold");

        let expected = "\
Title: Walnut
Global Parameters:
  Speed: 3000
  Power: 20
  Line Interval: 0.0250
  Passes: [empty]

Grid: Frequency (Y) vs Q-Pulse (X)
  Mode: Split (2 tabs)
  X counts: 4 -> 4 values
  Y counts: 2 -> 2 values

2 Notes:
  Grid 1: Frequency = 3800.0 | Q-Pulse = 167 → gold
  Grid 2: Frequency = 100.0 | Q-Pulse = 183 → crisp
";
        assert_eq!(session.summary().to_string(), expected);
    }

    #[test]
    fn test_summary_without_notes() {
        let mut session = Session::default();
        session.globals_mut().set_title("");
        let text = session.summary().to_string();
        assert!(text.starts_with("Title: [No title]\n"));
        assert!(text.contains("  Mode: Single\n"));
        assert!(text.ends_with("\nNo notes added yet.\n"));
    }

    #[test]
    fn test_single_grid_has_no_tab_prefix() {
        let mut session = Session::default();
        session.set_annotation(Cell::new(0, 0, 0), "first");
        let text = session.summary().to_string();
        assert!(text.contains("\n  Frequency = 3800.0 | Q-Pulse = 150 → first\n"));
    }
}
