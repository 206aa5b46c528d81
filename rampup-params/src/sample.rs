use rampup_core::{
    TimeSeries,
    constraint::{Constrained, Constraint},
};
use tracing::debug;

use crate::{ParamsError, ValidationError};

/// Evaluates `series` at `t`, naming `field` in any error.
pub(crate) fn sample(series: &TimeSeries, field: &'static str, t: f64) -> Result<f64, ParamsError> {
    series
        .value_at(t)
        .map_err(|source| ParamsError::Interpolation {
            field,
            time: t,
            source,
        })
}

/// Evaluates `series` at `t` and checks the sampled value against `C`.
pub(crate) fn sample_checked<C: Constraint<f64>>(
    series: &TimeSeries,
    section: &'static str,
    field: &'static str,
    t: f64,
) -> Result<f64, ParamsError> {
    let value = sample(series, field, t)?;

    Constrained::<f64, C>::new(value)
        .map(Constrained::into_inner)
        .map_err(|reason| {
            debug!(section, field, value, t, %reason, "sampled value failed validation");
            ValidationError {
                section,
                field,
                value,
                time: t,
                reason,
            }
            .into()
        })
}
