// gridmark/src/parameter.rs

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A physical quantity that can be varied along an axis or held as a global setting.
///
/// Declaration order is the catalogue order used for every stable listing (file preamble,
/// body columns, summary).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Parameter {
    Speed,
    Power,
    Frequency,
    LineInterval,
    Passes,
    QPulse,
}

/// How generated and serialized values of a parameter are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FormatClass {
    /// Rounded to the nearest integer, no decimals.
    Integer,
    Fixed4,
    Fixed1,
    #[default]
    Fixed2,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::Speed,
        Parameter::Power,
        Parameter::Frequency,
        Parameter::LineInterval,
        Parameter::Passes,
        Parameter::QPulse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Speed => "Speed",
            Parameter::Power => "Power",
            Parameter::Frequency => "Frequency",
            Parameter::LineInterval => "Line Interval",
            Parameter::Passes => "Passes",
            Parameter::QPulse => "Q-Pulse",
        }
    }

    /// Short label used inside the composite description of an exported row.
    pub fn short_label(&self) -> &'static str {
        match self {
            Parameter::Speed => "S",
            Parameter::Power => "P",
            Parameter::Frequency => "F",
            Parameter::LineInterval => "LI",
            Parameter::Passes => "Pass",
            Parameter::QPulse => "QP",
        }
    }

    pub fn format_class(&self) -> FormatClass {
        match self {
            Parameter::Speed | Parameter::Power | Parameter::Passes | Parameter::QPulse => {
                FormatClass::Integer
            }
            Parameter::LineInterval => FormatClass::Fixed4,
            Parameter::Frequency => FormatClass::Fixed1,
        }
    }

    pub fn format_value(&self, value: f64) -> String {
        self.format_class().format(value)
    }

    /// Operator-facing default range, as (start, end) text.
    pub fn default_range(&self) -> (&'static str, &'static str) {
        match self {
            Parameter::Speed => ("4000", "1000"),
            Parameter::Power => ("90", "10"),
            Parameter::Frequency => ("3800.0", "100.0"),
            Parameter::LineInterval => ("0.0010", "0.020"),
            Parameter::Passes => ("1", "10"),
            Parameter::QPulse => ("150", "200"),
        }
    }

    /// Default value when the parameter is held constant.
    pub fn default_global(&self) -> &'static str {
        match self {
            Parameter::Speed => "3000",
            Parameter::Power => "20",
            Parameter::Frequency => "1000",
            Parameter::LineInterval => "0.0250",
            Parameter::Passes => "10",
            Parameter::QPulse => "200",
        }
    }
}

impl FormatClass {
    pub fn format(&self, value: f64) -> String {
        let text = match self {
            FormatClass::Integer => format!("{:.0}", value.round()),
            FormatClass::Fixed4 => format!("{:.4}", value),
            FormatClass::Fixed1 => format!("{:.1}", value),
            FormatClass::Fixed2 => format!("{:.2}", value),
        };
        // a tiny negative sample renders as zero, never "-0"
        match text.strip_prefix('-') {
            Some(digits) if digits.chars().all(|c| c == '0' || c == '.') => digits.to_string(),
            _ => text,
        }
    }
}

/// Renders a free-form setting value for the human-readable composite description.
///
/// Integral numbers lose their decimals, magnitudes below one keep four decimals, anything
/// else keeps one. Non-numeric text is returned unchanged.
pub fn prettify_value(value: &str) -> String {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => {
            if number.fract() == 0.0 {
                FormatClass::Integer.format(number)
            } else if number.abs() < 1.0 {
                FormatClass::Fixed4.format(number)
            } else {
                FormatClass::Fixed1.format(number)
            }
        }
        _ => value.to_string(),
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown parameter: {0:?}")]
pub struct UnknownParameterError(pub String);

impl FromStr for Parameter {
    type Err = UnknownParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        Parameter::ALL
            .into_iter()
            .find(|p| {
                p.name()
                    .chars()
                    .filter(|c| !matches!(c, ' ' | '-'))
                    .flat_map(char::to_lowercase)
                    .eq(key.chars())
            })
            .ok_or_else(|| UnknownParameterError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("Q-Pulse".parse::<Parameter>(), Ok(Parameter::QPulse));
        assert_eq!("qpulse".parse::<Parameter>(), Ok(Parameter::QPulse));
        assert_eq!("line_interval".parse::<Parameter>(), Ok(Parameter::LineInterval));
        assert_eq!(" Line Interval ".parse::<Parameter>(), Ok(Parameter::LineInterval));
        assert!("Angle".parse::<Parameter>().is_err());
        for p in Parameter::ALL {
            assert_eq!(p.name().parse::<Parameter>(), Ok(p));
        }
    }

    #[test]
    fn test_format_classes() {
        assert_eq!(Parameter::Speed.format_value(2499.5), "2500");
        assert_eq!(Parameter::Power.format_value(-0.4), "0");
        assert_eq!(Parameter::LineInterval.format_value(0.001), "0.0010");
        assert_eq!(Parameter::Frequency.format_value(3800.0), "3800.0");
        assert_eq!(FormatClass::default().format(1.0 / 3.0), "0.33");
    }

    #[test]
    fn test_no_negative_zero() {
        assert_eq!(FormatClass::Integer.format(-0.0), "0");
        assert_eq!(FormatClass::Fixed1.format(-1e-12), "0.0");
        assert_eq!(FormatClass::Fixed2.format(-0.004), "0.00");
        assert_eq!(FormatClass::Fixed4.format(-0.00001), "0.0000");
        assert_eq!(FormatClass::Fixed1.format(-0.06), "-0.1");
        assert_eq!(FormatClass::Fixed4.format(-0.0010), "-0.0010");
    }

    #[test]
    fn test_prettify_value() {
        assert_eq!(prettify_value("3000"), "3000");
        assert_eq!(prettify_value("3000.0"), "3000");
        assert_eq!(prettify_value("0.025"), "0.0250");
        assert_eq!(prettify_value("1805.3"), "1805.3");
        assert_eq!(prettify_value("n/a"), "n/a");
    }
}
