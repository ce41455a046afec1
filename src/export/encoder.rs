// gridmark/src/export/encoder.rs

use super::errors::ExportError;
use super::format::{self, COMMENT_PREFIX, DELIMITER};
use crate::annotations::AnnotationStore;
use crate::globals::GlobalParameters;
use crate::grid::{Cell, GridConfig, GridState};
use crate::parameter::{prettify_value, Parameter};
use log::{debug, warn};
use std::time::SystemTime;

#[derive(Clone, Debug, Default)]
pub struct Encoder {
    generated_at: Option<SystemTime>,
}

/// Encodes with the current time as the generation timestamp.
pub fn encode(
    config: &GridConfig,
    grid: &GridState,
    annotations: &AnnotationStore,
    globals: &GlobalParameters,
) -> Result<String, ExportError> {
    Encoder::new().encode(config, grid, annotations, globals)
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the `Date` written into the preamble.
    pub fn generated_at(mut self, time: SystemTime) -> Self {
        self.generated_at = Some(time);
        self
    }

    pub fn encode(
        &self,
        config: &GridConfig,
        grid: &GridState,
        annotations: &AnnotationStore,
        globals: &GlobalParameters,
    ) -> Result<String, ExportError> {
        if annotations.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        let body = Self::encode_body(grid, annotations, globals)?;
        let mut output = self.encode_preamble(config, grid, globals);
        output.push('\n');
        output.push_str(&body);
        Ok(output)
    }

    fn encode_preamble(
        &self,
        config: &GridConfig,
        grid: &GridState,
        globals: &GlobalParameters,
    ) -> String {
        let generated_at = self.generated_at.unwrap_or_else(SystemTime::now);
        let mut output = format!("{} {}\n", COMMENT_PREFIX, format::BANNER);
        let date = humantime::format_rfc3339_seconds(generated_at).to_string();
        push_metadata(&mut output, "", format::KEY_DATE, &date);
        push_metadata(&mut output, "", format::KEY_X_AXIS, grid.x_parameter().name());
        push_metadata(&mut output, "", format::KEY_Y_AXIS, grid.y_parameter().name());
        push_metadata(&mut output, "", format::KEY_MODE, format::mode_name(config.split));
        push_metadata(&mut output, "", format::KEY_X_COUNTS, &config.x_count.to_string());
        push_metadata(&mut output, "", format::KEY_Y_COUNTS, &config.y_count.to_string());

        output.push_str(&format!("{}\n", COMMENT_PREFIX));
        push_metadata(&mut output, "", format::RANGES_HEADING, "");
        for parameter in Parameter::ALL {
            let range = config.ranges.get(parameter);
            let start = range.start.to_string();
            let end = range.end.to_string();
            push_metadata(&mut output, INDENT, &format::range_start_key(parameter), &start);
            push_metadata(&mut output, INDENT, &format::range_end_key(parameter), &end);
        }

        output.push_str(&format!("{}\n", COMMENT_PREFIX));
        push_metadata(&mut output, "", format::GLOBALS_HEADING, "");
        for (key, value) in globals.entries_excluding([grid.x_parameter(), grid.y_parameter()]) {
            push_metadata(&mut output, INDENT, &key, &value);
        }
        output
    }

    fn encode_body(
        grid: &GridState,
        annotations: &AnnotationStore,
        globals: &GlobalParameters,
    ) -> Result<String, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(format::header())?;

        let mut rows = 0;
        for (cell, note) in annotations.iter() {
            match Self::encode_row(grid, globals, cell, note) {
                Some(record) => {
                    writer.write_record(&record)?;
                    rows += 1;
                }
                None => warn!("Skipping note at {:?}: cell is outside the current grid", cell),
            }
        }
        if rows == 0 {
            return Err(ExportError::NothingToExport);
        }
        debug!("Encoded {} rows", rows);

        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    fn encode_row(
        grid: &GridState,
        globals: &GlobalParameters,
        cell: Cell,
        note: &str,
    ) -> Option<Vec<String>> {
        let x_value = grid.x_value(cell)?;
        let y_value = grid.y_value(cell)?;
        let axis_values = [(grid.x_parameter(), x_value), (grid.y_parameter(), y_value)];
        let effective =
            |parameter: Parameter| globals.effective(parameter, &axis_values).unwrap_or("");

        let mut record = vec![
            note.to_string(),
            cell.tab.to_string(),
            grid.x_parameter().name().to_string(),
            x_value.to_string(),
            grid.y_parameter().name().to_string(),
            y_value.to_string(),
            composite_title(note, globals, &axis_values),
        ];
        record.extend(Parameter::ALL.iter().map(|&p| effective(p).to_string()));
        Some(record)
    }
}

/// `<note> (S:.. P:.. F:.. QP:.. LI:.. Pass:..)` with the effective value of each parameter.
pub fn composite_title(
    note: &str,
    globals: &GlobalParameters,
    axis_values: &[(Parameter, &str)],
) -> String {
    const ORDER: [Parameter; 6] = [
        Parameter::Speed,
        Parameter::Power,
        Parameter::Frequency,
        Parameter::QPulse,
        Parameter::LineInterval,
        Parameter::Passes,
    ];
    let settings = ORDER
        .iter()
        .map(|&parameter| {
            let value = globals
                .effective(parameter, axis_values)
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| "?".to_string(), prettify_value);
            format!("{}:{}", parameter.short_label(), value)
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} ({})", note, settings).trim().to_string()
}

const INDENT: &str = "  ";

fn push_metadata(output: &mut String, indent: &str, key: &str, value: &str) {
    let line = format!("{} {}{}: {}", COMMENT_PREFIX, indent, key, value);
    output.push_str(line.replace(['\r', '\n'], " ").trim_end());
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{apply, GridConfigBuilder};
    use pretty_assertions::assert_eq;
    use std::time::{Duration, UNIX_EPOCH};

    fn fixture() -> (GridConfig, GridState, GlobalParameters) {
        let config = GridConfigBuilder::default()
            .x_axis(Parameter::QPulse)
            .y_axis(Parameter::Frequency)
            .x_count(3)
            .y_count(2)
            .build()
            .unwrap();
        let grid = apply(&config.grid_spec()).unwrap();
        let mut globals = GlobalParameters::untitled();
        globals.set_title("Walnut");
        (config, grid, globals)
    }

    fn pinned() -> Encoder {
        Encoder::new().generated_at(UNIX_EPOCH + Duration::from_secs(1_790_000_000))
    }

    #[test]
    fn test_nothing_to_export() {
        let (config, grid, globals) = fixture();
        let result = pinned().encode(&config, &grid, &AnnotationStore::new(), &globals);
        assert!(matches!(result, Err(ExportError::NothingToExport)));
    }

    #[test]
    fn test_encoded_layout() {
        let (config, grid, globals) = fixture();
        let mut notes = AnnotationStore::new();
        notes.set(Cell::new(0, 1, 2), "best | crisp");
        notes.set(Cell::new(0, 0, 0), "gold");

        let text = pinned().encode(&config, &grid, &notes, &globals).unwrap();
        let expected = "\
# Laser Test Grid Export - Metadata
# Date: 2026-09-21T14:13:20Z
# X_Axis: Q-Pulse
# Y_Axis: Frequency
# Mode: Single
# X_counts: 3
# Y_counts: 2
#
# Parameter Ranges:
#   Speed_start: 4000
#   Speed_end: 1000
#   Power_start: 90
#   Power_end: 10
#   Frequency_start: 3800
#   Frequency_end: 100
#   Line Interval_start: 0.001
#   Line Interval_end: 0.02
#   Passes_start: 1
#   Passes_end: 10
#   Q-Pulse_start: 150
#   Q-Pulse_end: 200
#
# Global Parameters:
#   Title: Walnut
#   Speed: 3000
#   Power: 20
#   Line Interval: 0.0250
#   Passes: 10

Note|Tab|X_Param|X_Value|Y_Param|Y_Value|Title|Speed|Power|Frequency|Line Interval|Passes|Q-Pulse
gold|0|Q-Pulse|150|Frequency|3800.0|gold (S:3000 P:20 F:3800 QP:150 LI:0.0250 Pass:10)|3000|20|3800.0|0.0250|10|150
\"best | crisp\"|0|Q-Pulse|200|Frequency|100.0|\"best | crisp (S:3000 P:20 F:100 QP:200 LI:0.0250 Pass:10)\"|3000|20|100.0|0.0250|10|200
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_deterministic_apart_from_date() {
        let (config, grid, globals) = fixture();
        let mut notes = AnnotationStore::new();
        notes.set(Cell::new(0, 1, 1), "ok");
        let first = pinned().encode(&config, &grid, &notes, &globals).unwrap();
        let second = pinned().encode(&config, &grid, &notes, &globals).unwrap();
        assert_eq!(first, second);

        let later = Encoder::new()
            .generated_at(UNIX_EPOCH + Duration::from_secs(1_800_000_000))
            .encode(&config, &grid, &notes, &globals)
            .unwrap();
        let strip = |text: &str| {
            text.lines()
                .filter(|l| !l.starts_with("# Date:"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(strip(&first), strip(&later));
    }

    #[test]
    fn test_composite_title() {
        let globals = GlobalParameters::untitled();
        let title = composite_title(
            "gold",
            &globals,
            &[(Parameter::QPulse, "175"), (Parameter::Frequency, "1805.3")],
        );
        assert_eq!(title, "gold (S:3000 P:20 F:1805.3 QP:175 LI:0.0250 Pass:10)");
    }
}
