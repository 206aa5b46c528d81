//! Interpolation of scalar knots at an arbitrary query point.
//!
//! [`Interpolator`] wraps a one-dimensional [`ninterp`] table and adds the
//! behavior every runtime parameter relies on: values outside the knot range
//! are clamped to the nearest boundary value, a single knot is a constant,
//! and an exact knot hit returns that knot's own value in every mode.

use std::{fmt, sync::Arc};

use ndarray::Array1;
use ninterp::{
    error::{InterpolateError, ValidateError},
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator as _},
    strategy::enums::Strategy1DEnum,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Component;

/// Mode used when a time series is supplied without an explicit mode tag.
pub const DEFAULT_INTERPOLATION_MODE: InterpolationMode = InterpolationMode::Linear;

/// How values are estimated between knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Holds the value of the greatest knot at or before the query point.
    #[serde(alias = "STEP")]
    Step,

    /// Piecewise-linear interpolation between the two bracketing knots.
    #[default]
    #[serde(alias = "piecewise_linear", alias = "PIECEWISE_LINEAR")]
    Linear,
}

impl InterpolationMode {
    fn strategy(self) -> Strategy1DEnum {
        match self {
            InterpolationMode::Step => ninterp::strategy::LeftNearest.into(),
            InterpolationMode::Linear => ninterp::strategy::Linear.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum InterpError {
    #[error("cannot interpolate without knots")]
    Empty,
    #[error("knot count mismatch: {points} points but {values} values")]
    LengthMismatch { points: usize, values: usize },
    #[error("query point is not a number")]
    NanQuery,
    #[error(transparent)]
    Validation(#[from] ValidateError),
    #[error(transparent)]
    Interpolation(#[from] InterpolateError),
}

/// Evaluates scalar knots `(x, f(x))` at arbitrary `x`.
///
/// Knot positions must be strictly increasing; the underlying table rejects
/// anything else when it is built.
///
/// # Examples
///
/// ```
/// use rampup_core::interpolation::Interpolator;
/// use rampup_core::InterpolationMode;
///
/// let linear = Interpolator::new(vec![0.0, 4.0], vec![1.0, 4.0], InterpolationMode::Linear).unwrap();
/// assert_eq!(linear.evaluate(1.0).unwrap(), 1.75);
///
/// let step = Interpolator::new(vec![0.0, 4.0], vec![1.0, 4.0], InterpolationMode::Step).unwrap();
/// assert_eq!(step.evaluate(1.0).unwrap(), 1.0);
/// assert_eq!(step.evaluate(4.0).unwrap(), 4.0);
/// ```
#[derive(Clone)]
pub struct Interpolator {
    points: Vec<f64>,
    values: Vec<f64>,
    mode: InterpolationMode,
    table: Option<Arc<Interp1DOwned<f64, Strategy1DEnum>>>,
}

impl Interpolator {
    /// Creates an interpolator from knot positions, values, and a mode.
    ///
    /// A single knot needs no table and always evaluates to its value.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no knots, if the slices differ in length,
    /// or if the table rejects the knots (e.g., unsorted positions).
    pub fn new(
        points: Vec<f64>,
        values: Vec<f64>,
        mode: InterpolationMode,
    ) -> Result<Self, InterpError> {
        if points.len() != values.len() {
            return Err(InterpError::LengthMismatch {
                points: points.len(),
                values: values.len(),
            });
        }

        let table = match points.len() {
            0 => return Err(InterpError::Empty),
            1 => None,
            _ => Some(Arc::new(Interp1DOwned::new(
                Array1::from(points.clone()),
                Array1::from(values.clone()),
                mode.strategy(),
                Extrapolate::Clamp,
            )?)),
        };

        Ok(Self {
            points,
            values,
            mode,
            table,
        })
    }

    /// Creates an interpolator with a single knot at zero.
    pub(crate) fn constant(value: f64, mode: InterpolationMode) -> Self {
        Self {
            points: vec![0.0],
            values: vec![value],
            mode,
            table: None,
        }
    }

    /// Evaluates the knots at `x`.
    ///
    /// - Before the first knot, returns the first value.
    /// - After the last knot, returns the last value.
    /// - At a knot, returns that knot's value.
    /// - Otherwise, applies the interpolation mode between the bracketing knots.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` is NaN, or if there are no knots.
    pub fn evaluate(&self, x: f64) -> Result<f64, InterpError> {
        if x.is_nan() {
            return Err(InterpError::NanQuery);
        }

        let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) else {
            return Err(InterpError::Empty);
        };

        if x <= first {
            return self.values.first().copied().ok_or(InterpError::Empty);
        }
        if x >= last {
            return self.values.last().copied().ok_or(InterpError::Empty);
        }
        if let Ok(index) = self.points.binary_search_by(|p| p.total_cmp(&x)) {
            return Ok(self.values[index]);
        }

        match &self.table {
            Some(table) => Ok(table.interpolate(&[x])?),
            None => self.values.first().copied().ok_or(InterpError::Empty),
        }
    }

    /// Returns the interpolation mode.
    #[must_use]
    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    /// Returns the knot positions, in increasing order.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Returns the knot values, in the same order as [`Interpolator::points`].
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpolator")
            .field("points", &self.points)
            .field("values", &self.values)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Two interpolators are equal if they share knots and mode.
impl PartialEq for Interpolator {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.points == other.points && self.values == other.values
    }
}

impl Component for Interpolator {
    type Input = f64;
    type Output = f64;
    type Error = InterpError;

    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        self.evaluate(input)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn mode_interp_matches_expected_value() {
        let test_cases = [
            (InterpolationMode::Linear, 0.56),
            (InterpolationMode::Step, 0.4),
        ];

        for (mode, expected) in test_cases {
            let interp =
                Interpolator::new(vec![0., 1., 2.], vec![0.0, 0.4, 0.8], mode).unwrap();

            let actual = interp.call(1.4).unwrap();
            assert!(
                approx::relative_eq!(actual, expected),
                "mode {mode:?} produced wrong result: got {actual}, expected {expected}",
            );
        }
    }

    #[test]
    fn clamps_outside_the_knot_range() {
        for mode in [InterpolationMode::Linear, InterpolationMode::Step] {
            let interp = Interpolator::new(vec![0.0, 2.0], vec![1.0, 3.0], mode).unwrap();
            assert_relative_eq!(interp.evaluate(-10.0).unwrap(), 1.0);
            assert_relative_eq!(interp.evaluate(10.0).unwrap(), 3.0);
        }
    }

    #[test]
    fn step_switches_exactly_at_interior_knots() {
        let interp = Interpolator::new(
            vec![0.0, 1.0, 2.0],
            vec![10.0, 20.0, 30.0],
            InterpolationMode::Step,
        )
        .unwrap();

        assert_relative_eq!(interp.evaluate(0.999).unwrap(), 10.0);
        assert_relative_eq!(interp.evaluate(1.0).unwrap(), 20.0);
        assert_relative_eq!(interp.evaluate(1.5).unwrap(), 20.0);
        assert_relative_eq!(interp.evaluate(2.0).unwrap(), 30.0);
    }

    #[test]
    fn single_knot_is_constant() {
        let interp = Interpolator::new(vec![3.0], vec![7.0], InterpolationMode::Linear).unwrap();
        for x in [-1.0, 3.0, 100.0] {
            assert_relative_eq!(interp.evaluate(x).unwrap(), 7.0);
        }
    }

    #[test]
    fn rejects_empty_and_mismatched_knots() {
        assert!(matches!(
            Interpolator::new(vec![], vec![], InterpolationMode::Linear),
            Err(InterpError::Empty)
        ));
        assert!(matches!(
            Interpolator::new(vec![0.0, 1.0], vec![1.0], InterpolationMode::Linear),
            Err(InterpError::LengthMismatch {
                points: 2,
                values: 1
            })
        ));
    }

    #[test]
    fn rejects_nan_queries() {
        let interp =
            Interpolator::new(vec![0.0, 1.0], vec![0.0, 1.0], InterpolationMode::Linear).unwrap();
        assert!(matches!(interp.evaluate(f64::NAN), Err(InterpError::NanQuery)));
    }

    #[test]
    fn mode_names_deserialize() {
        let cases = [
            ("\"step\"", InterpolationMode::Step),
            ("\"STEP\"", InterpolationMode::Step),
            ("\"linear\"", InterpolationMode::Linear),
            ("\"PIECEWISE_LINEAR\"", InterpolationMode::Linear),
        ];
        for (json, expected) in cases {
            let mode: InterpolationMode = serde_json::from_str(json).unwrap();
            assert_eq!(mode, expected);
        }
    }
}
