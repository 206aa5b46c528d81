//! Time series, interpolation, and numeric constraints for rampup.
//!
//! Everything a runtime parameter needs before it knows about a grid lives
//! here: the [`Component`] trait used to evaluate things at a query time,
//! the [`TimeSeries`] type with its selectable [`InterpolationMode`], and the
//! [`constraint`] module used to validate sampled values.

mod component;
mod time_series;

pub mod constraint;
pub mod interpolation;

pub use component::Component;
pub use interpolation::{DEFAULT_INTERPOLATION_MODE, InterpolationMode};
pub use time_series::{
    Knots, ScalarInput, SwitchInput, SwitchSeries, TimeSeries, TimeSeriesError,
};
