use serde::Deserialize;

use crate::{
    InterpolationMode,
    interpolation::{InterpError, Interpolator},
};

use super::{SwitchInput, TimeSeries, TimeSeriesError};

/// A boolean that may change over simulation time.
///
/// Stored as a step [`TimeSeries`] of `1.0`/`0.0`; a switch is on at `t` if
/// the greatest knot at or before `t` is on.
/// Before the first knot the first value applies.
///
/// # Examples
///
/// ```
/// use rampup_core::SwitchSeries;
///
/// let switch = SwitchSeries::new([(0.0, true), (1.0, false)]).unwrap();
/// assert!(switch.value_at(0.5).unwrap());
/// assert!(!switch.value_at(1.0).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SwitchInput")]
pub struct SwitchSeries(TimeSeries);

impl SwitchSeries {
    /// Creates a switch from `(time, on)` knots given in time order.
    ///
    /// # Errors
    ///
    /// See [`TimeSeries::new`].
    pub fn new<I>(knots: I) -> Result<Self, TimeSeriesError>
    where
        I: IntoIterator<Item = (f64, bool)>,
    {
        let knots = knots
            .into_iter()
            .map(|(t, on)| (t, if on { 1.0 } else { 0.0 }));
        Ok(Self(TimeSeries::new(knots, InterpolationMode::Step)?))
    }

    /// Creates a switch that never changes.
    #[must_use]
    pub fn constant(on: bool) -> Self {
        let value = if on { 1.0 } else { 0.0 };
        Self(TimeSeries {
            interpolator: Interpolator::constant(value, InterpolationMode::Step),
        })
    }

    /// Returns whether the switch is on at time `t`.
    ///
    /// # Errors
    ///
    /// Returns an [`InterpError`] if `t` is NaN.
    pub fn value_at(&self, t: f64) -> Result<bool, InterpError> {
        Ok(self.0.value_at(t)? != 0.0)
    }
}

impl TryFrom<SwitchInput> for SwitchSeries {
    type Error = TimeSeriesError;

    fn try_from(input: SwitchInput) -> Result<Self, Self::Error> {
        match input {
            SwitchInput::Constant(on) => Ok(Self::constant(on)),
            SwitchInput::Series(knots) => Self::new(knots),
        }
    }
}
