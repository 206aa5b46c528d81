use serde::Deserialize;

use crate::InterpolationMode;

use super::Knots;

/// Raw configuration input for a scalar, possibly time-dependent, field.
///
/// Accepted forms:
/// - a literal: `4.5`
/// - a time→value mapping: `{"0.0": 2.0, "4.0": 4.0}`
/// - a mapping tagged with a mode: `[{"5.0": 6.0, "7.0": 8.0}, "step"]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarInput {
    Constant(f64),
    Series(Knots<f64>),
    SeriesWithMode(Knots<f64>, InterpolationMode),
}

impl From<f64> for ScalarInput {
    fn from(value: f64) -> Self {
        ScalarInput::Constant(value)
    }
}

/// Raw configuration input for an on/off switch that may change over time.
///
/// Either a literal `true`/`false` or a time→bool mapping.
/// Switches always use step interpolation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SwitchInput {
    Constant(bool),
    Series(Knots<bool>),
}

impl From<bool> for SwitchInput {
    fn from(value: bool) -> Self {
        SwitchInput::Constant(value)
    }
}
