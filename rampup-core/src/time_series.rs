mod input;
mod knots;
mod switch;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    Component,
    interpolation::{DEFAULT_INTERPOLATION_MODE, InterpError, InterpolationMode, Interpolator},
};

pub use input::{ScalarInput, SwitchInput};
pub use knots::Knots;
pub use switch::SwitchSeries;

/// Error returned when a [`TimeSeries`] cannot be built from its knots.
#[derive(Debug, Error)]
pub enum TimeSeriesError {
    #[error("time series has no knots")]
    Empty,

    #[error("knot time {time} is not finite")]
    NonFiniteTime { time: f64 },

    #[error("knot value {value} at time {time} is not finite")]
    NonFiniteValue { time: f64, value: f64 },

    #[error("knot times must be strictly increasing: {previous} is followed by {next}")]
    NonIncreasing { previous: f64, next: f64 },

    #[error("failed to build interpolation table")]
    Table(#[from] InterpError),
}

/// A scalar quantity that varies with simulation time.
///
/// A `TimeSeries` is an ordered set of `(time, value)` knots with strictly
/// increasing times and an [`InterpolationMode`].
/// Evaluating before the first knot or after the last one clamps to the
/// nearest boundary value; a single knot is a constant.
///
/// Time series are immutable once built and cheap to clone.
///
/// # Examples
///
/// ```
/// use rampup_core::{InterpolationMode, TimeSeries};
///
/// let series = TimeSeries::new([(0.0, 2.0), (4.0, 4.0)], InterpolationMode::Linear).unwrap();
///
/// assert_eq!(series.value_at(1.0).unwrap(), 2.5);
/// assert_eq!(series.value_at(-1.0).unwrap(), 2.0);
/// assert_eq!(series.value_at(9.0).unwrap(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ScalarInput")]
pub struct TimeSeries {
    interpolator: Interpolator,
}

impl TimeSeries {
    /// Creates a time series from `(time, value)` knots given in time order.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeSeriesError`] if there are no knots, if any time or
    /// value is not finite, or if the times are not strictly increasing.
    pub fn new<I>(knots: I, mode: InterpolationMode) -> Result<Self, TimeSeriesError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (times, values): (Vec<f64>, Vec<f64>) = knots.into_iter().unzip();

        if times.is_empty() {
            return Err(TimeSeriesError::Empty);
        }

        for (&time, &value) in times.iter().zip(&values) {
            if !time.is_finite() {
                return Err(TimeSeriesError::NonFiniteTime { time });
            }
            if !value.is_finite() {
                return Err(TimeSeriesError::NonFiniteValue { time, value });
            }
        }

        if let Some(pair) = times.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(TimeSeriesError::NonIncreasing {
                previous: pair[0],
                next: pair[1],
            });
        }

        Ok(Self {
            interpolator: Interpolator::new(times, values, mode)?,
        })
    }

    /// Creates a time series with the default interpolation mode.
    ///
    /// # Errors
    ///
    /// See [`TimeSeries::new`].
    pub fn from_knots<I>(knots: I) -> Result<Self, TimeSeriesError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(knots, DEFAULT_INTERPOLATION_MODE)
    }

    /// Creates a series that has the same value at every time.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::NonFiniteValue`] if `value` is not finite.
    pub fn constant(value: f64) -> Result<Self, TimeSeriesError> {
        Self::new([(0.0, value)], DEFAULT_INTERPOLATION_MODE)
    }

    /// Returns the value of the series at time `t`.
    ///
    /// # Errors
    ///
    /// Returns an [`InterpError`] if `t` is NaN.
    pub fn value_at(&self, t: f64) -> Result<f64, InterpError> {
        self.interpolator.evaluate(t)
    }

    /// Returns the interpolation mode.
    #[must_use]
    pub fn mode(&self) -> InterpolationMode {
        self.interpolator.mode()
    }

    /// Returns the knot times, in increasing order.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        self.interpolator.points()
    }

    /// Returns the knot values, in time order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        self.interpolator.values()
    }

    /// Returns `true` if the series has a single knot.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.times().len() == 1
    }
}

impl Component for TimeSeries {
    type Input = f64;
    type Output = f64;
    type Error = InterpError;

    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        self.value_at(input)
    }
}

impl TryFrom<ScalarInput> for TimeSeries {
    type Error = TimeSeriesError;

    fn try_from(input: ScalarInput) -> Result<Self, Self::Error> {
        match input {
            ScalarInput::Constant(value) => Self::constant(value),
            ScalarInput::Series(knots) => Self::new(knots, DEFAULT_INTERPOLATION_MODE),
            ScalarInput::SeriesWithMode(knots, mode) => Self::new(knots, mode),
        }
    }
}
