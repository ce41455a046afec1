// gridmark/src/globals.rs

use crate::parameter::Parameter;
use std::collections::BTreeMap;
use std::time::SystemTime;
use thiserror::Error;

pub const TITLE_KEY: &str = "Title";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid setting name {0:?}: must be non-empty, single-line and free of ':'")]
pub struct InvalidSettingName(pub String);

/// Settings held constant across the whole grid, stored as the operator typed them.
///
/// Besides the title and one value per [`Parameter`], any other named setting (for example
/// scan-mode metadata from older files) is kept verbatim in `extra`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalParameters {
    title: String,
    values: BTreeMap<Parameter, String>,
    extra: BTreeMap<String, String>,
}

impl GlobalParameters {
    /// Parameter defaults with an empty title.
    pub fn untitled() -> Self {
        Self {
            title: String::new(),
            values: Parameter::ALL
                .into_iter()
                .map(|p| (p, p.default_global().to_string()))
                .collect(),
            extra: BTreeMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.trim().to_string();
    }

    pub fn get(&self, parameter: Parameter) -> Option<&str> {
        self.values.get(&parameter).map(String::as_str)
    }

    pub fn set(&mut self, parameter: Parameter, value: &str) {
        self.values.insert(parameter, value.trim().to_string());
    }

    pub fn extra(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets any named setting. Title and parameter names are routed to their typed slots.
    ///
    /// Names are written as `# name: value` lines, so a name must not contain `:` or a line
    /// break.
    pub fn set_named(&mut self, key: &str, value: &str) -> Result<(), InvalidSettingName> {
        let key = key.trim();
        if key.is_empty() || key.contains([':', '\r', '\n']) {
            return Err(InvalidSettingName(key.to_string()));
        }
        if key == TITLE_KEY {
            self.set_title(value);
        } else if let Ok(parameter) = key.parse::<Parameter>() {
            self.set(parameter, value);
        } else {
            self.extra.insert(key.to_string(), value.trim().to_string());
        }
        Ok(())
    }

    /// Every setting except the axis-driven parameters, in stable order: title, parameters
    /// in catalogue order, then extra settings sorted by key.
    pub fn entries_excluding(&self, axes: [Parameter; 2]) -> Vec<(String, String)> {
        let mut entries = vec![(TITLE_KEY.to_string(), self.title.clone())];
        entries.extend(
            self.values
                .iter()
                .filter(|(p, _)| !axes.contains(p))
                .map(|(p, v)| (p.name().to_string(), v.clone())),
        );
        entries.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        entries
    }

    /// Value of `parameter` at a cell whose axis values are `axis_values`.
    pub fn effective<'a>(
        &'a self,
        parameter: Parameter,
        axis_values: &[(Parameter, &'a str)],
    ) -> Option<&'a str> {
        axis_values
            .iter()
            .find(|(p, _)| *p == parameter)
            .map(|(_, v)| *v)
            .or_else(|| self.get(parameter))
    }

    /// `laser_test_<title>.csv` with spaces replaced and the title cut to 30 characters.
    pub fn suggested_file_name(&self) -> String {
        let title = if self.title.trim().is_empty() {
            "test".to_string()
        } else {
            self.title.replace(' ', "_").chars().take(30).collect()
        };
        format!("laser_test_{}.csv", title)
    }
}

impl Default for GlobalParameters {
    fn default() -> Self {
        let mut globals = Self::untitled();
        let timestamp = humantime::format_rfc3339_seconds(SystemTime::now()).to_string();
        let today = timestamp.get(..10).unwrap_or(&timestamp);
        globals.set_title(&format!("Laser Test - {}", today));
        globals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let globals = GlobalParameters::default();
        assert!(globals.title().starts_with("Laser Test - "));
        assert_eq!(globals.get(Parameter::Speed), Some("3000"));
        assert_eq!(globals.get(Parameter::LineInterval), Some("0.0250"));
        assert_eq!(globals.extra().count(), 0);
    }

    #[test]
    fn test_set_named_routes_keys() {
        let mut globals = GlobalParameters::untitled();
        globals.set_named("Title", " Walnut ").unwrap();
        globals.set_named("Q-Pulse", "180").unwrap();
        globals.set_named("Angle Increment", "15").unwrap();
        assert_eq!(globals.title(), "Walnut");
        assert_eq!(globals.get(Parameter::QPulse), Some("180"));
        assert_eq!(globals.extra().collect::<Vec<_>>(), vec![("Angle Increment", "15")]);
    }

    #[test]
    fn test_set_named_rejects_unwritable_names() {
        let mut globals = GlobalParameters::untitled();
        assert_eq!(
            globals.set_named("a:b", "c"),
            Err(InvalidSettingName("a:b".to_string()))
        );
        assert!(globals.set_named("two\nlines", "c").is_err());
        assert!(globals.set_named("  ", "c").is_err());
        assert_eq!(globals.extra().count(), 0);
    }

    #[test]
    fn test_entries_exclude_axes() {
        let mut globals = GlobalParameters::untitled();
        globals.set_named("Cross-hatch", "Yes").unwrap();
        let keys: Vec<String> = globals
            .entries_excluding([Parameter::QPulse, Parameter::Frequency])
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec!["Title", "Speed", "Power", "Line Interval", "Passes", "Cross-hatch"]
        );
    }

    #[test]
    fn test_effective_values() {
        let globals = GlobalParameters::untitled();
        let axes = [(Parameter::Power, "55")];
        assert_eq!(globals.effective(Parameter::Power, &axes), Some("55"));
        assert_eq!(globals.effective(Parameter::Speed, &axes), Some("3000"));
    }

    #[test]
    fn test_suggested_file_name() {
        let mut globals = GlobalParameters::untitled();
        assert_eq!(globals.suggested_file_name(), "laser_test_test.csv");
        globals.set_title("Birch ply 3mm first pass with a long title");
        assert_eq!(
            globals.suggested_file_name(),
            "laser_test_Birch_ply_3mm_first_pass_with_.csv"
        );
    }
}
