// gridmark/src/export/format.rs

//! Layout of an exported session (format version 2).
//!
//! ```text
//! # Laser Test Grid Export - Metadata
//! # Date: 2026-10-16T09:30:00Z
//! # X_Axis: Q-Pulse
//! # Y_Axis: Frequency
//! # Mode: Split
//! # X_counts: 20
//! # Y_counts: 20
//! #
//! # Parameter Ranges:
//! #   Speed_start: 4000
//! #   Speed_end: 1000
//! #   ...one start/end pair per parameter
//! #
//! # Global Parameters:
//! #   Title: Walnut
//! #   Speed: 3000
//! #   ...every non-axis parameter, then extra settings sorted by key
//!
//! Note|Tab|X_Param|X_Value|Y_Param|Y_Value|Title|Speed|Power|Frequency|Line Interval|Passes|Q-Pulse
//! gold|1|Q-Pulse|150|Frequency|3410.5|gold (S:3000 P:20 F:3410.5 QP:150 LI:0.0250 Pass:10)|3000|...
//! ```
//!
//! The preamble is written in the fixed order above and may be read in any order. Lines
//! starting with `#` are metadata only before the table header; a metadata line needs a `:`
//! and everything after the first `:` is the value. The body is pipe-delimited CSV, quoted
//! where a field contains `|` or `"`. Columns are located by header name when reading.

use crate::parameter::Parameter;

pub const COMMENT_PREFIX: char = '#';
pub const DELIMITER: u8 = b'|';

pub const BANNER: &str = "Laser Test Grid Export - Metadata";
pub const RANGES_HEADING: &str = "Parameter Ranges";
pub const GLOBALS_HEADING: &str = "Global Parameters";

pub const KEY_DATE: &str = "Date";
pub const KEY_X_AXIS: &str = "X_Axis";
pub const KEY_Y_AXIS: &str = "Y_Axis";
pub const KEY_MODE: &str = "Mode";
pub const KEY_X_COUNTS: &str = "X_counts";
pub const KEY_Y_COUNTS: &str = "Y_counts";

pub const MODE_SPLIT: &str = "Split";
pub const MODE_SINGLE: &str = "Single";

pub const COL_NOTE: &str = "Note";
pub const COL_TAB: &str = "Tab";
pub const COL_X_PARAM: &str = "X_Param";
pub const COL_X_VALUE: &str = "X_Value";
pub const COL_Y_PARAM: &str = "Y_Param";
pub const COL_Y_VALUE: &str = "Y_Value";
pub const COL_TITLE: &str = "Title";

pub fn range_start_key(parameter: Parameter) -> String {
    format!("{}_start", parameter.name())
}

pub fn range_end_key(parameter: Parameter) -> String {
    format!("{}_end", parameter.name())
}

pub fn mode_name(split: bool) -> &'static str {
    if split {
        MODE_SPLIT
    } else {
        MODE_SINGLE
    }
}

/// Anything other than `Split` (including legacy scan modes) means a single grid.
pub fn parse_mode(value: &str) -> bool {
    value.trim() == MODE_SPLIT
}

/// Keys that carry no setting and are never turned into global parameters.
pub fn is_bookkeeping_key(key: &str) -> bool {
    matches!(key, KEY_DATE | RANGES_HEADING | GLOBALS_HEADING)
}

pub fn header() -> Vec<&'static str> {
    let mut columns = vec![
        COL_NOTE,
        COL_TAB,
        COL_X_PARAM,
        COL_X_VALUE,
        COL_Y_PARAM,
        COL_Y_VALUE,
        COL_TITLE,
    ];
    columns.extend(Parameter::ALL.iter().map(|p| p.name()));
    columns
}

/// Splits a `# key: value` line. Returns `None` for anything else.
pub fn split_metadata_line(line: &str) -> Option<(&str, &str)> {
    let body = line.trim().strip_prefix(COMMENT_PREFIX)?;
    let (key, value) = body.split_once(':')?;
    Some((key.trim(), value.trim()))
}
