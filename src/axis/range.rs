// gridmark/src/axis/range.rs

use super::errors::RangeParseError;
use crate::parameter::Parameter;
use std::collections::BTreeMap;

/// Start and end of the sampled interval for one parameter. Descending ranges are valid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub parameter: Parameter,
    pub start: f64,
    pub end: f64,
}

impl AxisRange {
    pub fn new(parameter: Parameter, start: f64, end: f64) -> Result<Self, RangeParseError> {
        Self::validate_finite(parameter, "start", start)?;
        Self::validate_finite(parameter, "end", end)?;
        Ok(Self {
            parameter,
            start,
            end,
        })
    }

    /// Builds a range from operator text, e.g. the two entry fields of a range row.
    pub fn parse(parameter: Parameter, start: &str, end: &str) -> Result<Self, RangeParseError> {
        let start = Self::parse_bound(parameter, "start", start)?;
        let end = Self::parse_bound(parameter, "end", end)?;
        Self::new(parameter, start, end)
    }

    pub fn parse_bound(
        parameter: Parameter,
        field: &'static str,
        value: &str,
    ) -> Result<f64, RangeParseError> {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| RangeParseError::InvalidNumber {
                parameter,
                field,
                value: value.to_string(),
            })
    }

    fn validate_finite(
        parameter: Parameter,
        field: &'static str,
        value: f64,
    ) -> Result<(), RangeParseError> {
        if !value.is_finite() {
            return Err(RangeParseError::NonFinite {
                parameter,
                field,
                value,
            });
        }
        Ok(())
    }
}

/// One range per parameter, so switching axes never loses what the operator typed.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeTable {
    ranges: BTreeMap<Parameter, AxisRange>,
}

impl RangeTable {
    pub fn get(&self, parameter: Parameter) -> AxisRange {
        match self.ranges.get(&parameter) {
            Some(range) => *range,
            None => Self::default_range(parameter),
        }
    }

    pub fn set(&mut self, range: AxisRange) {
        self.ranges.insert(range.parameter, range);
    }

    pub fn iter(&self) -> impl Iterator<Item = &AxisRange> {
        self.ranges.values()
    }

    fn default_range(parameter: Parameter) -> AxisRange {
        let (start, end) = parameter.default_range();
        // defaults are literal decimals
        AxisRange {
            parameter,
            start: start.parse().unwrap_or_default(),
            end: end.parse().unwrap_or_default(),
        }
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        let ranges = Parameter::ALL
            .into_iter()
            .map(|p| (p, Self::default_range(p)))
            .collect();
        Self { ranges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        let range = AxisRange::parse(Parameter::Frequency, " 3800.0", "100").unwrap();
        assert_eq!(range.start, 3800.0);
        assert_eq!(range.end, 100.0);

        let err = AxisRange::parse(Parameter::Power, "abc", "10").unwrap_err();
        assert_eq!(
            err,
            RangeParseError::InvalidNumber {
                parameter: Parameter::Power,
                field: "start",
                value: "abc".to_string(),
            }
        );
        assert!(matches!(
            AxisRange::parse(Parameter::Power, "1", "inf"),
            Err(RangeParseError::NonFinite { field: "end", .. })
        ));
    }

    #[test]
    fn test_range_table_defaults() {
        let mut table = RangeTable::default();
        assert_eq!(table.iter().count(), Parameter::ALL.len());
        let qpulse = table.get(Parameter::QPulse);
        assert_eq!((qpulse.start, qpulse.end), (150.0, 200.0));

        table.set(AxisRange::new(Parameter::QPulse, 10.0, 20.0).unwrap());
        assert_eq!(table.get(Parameter::QPulse).end, 20.0);
        assert_eq!(table.get(Parameter::Speed).start, 4000.0);
    }
}
