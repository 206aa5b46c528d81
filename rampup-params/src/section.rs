use rampup_core::{ScalarInput, SwitchInput, SwitchSeries, TimeSeries};

use crate::{ConfigError, ParamsError, ProfileInput, SpatialField};

/// One section of the configuration, split into static and dynamic parts.
///
/// `Static` holds only properties that change solver structure and must be
/// comparable for equality; `Dynamic` holds values resolved at a query time.
/// Keeping them as separate types means a field cannot silently move from
/// one side of the partition to the other.
pub trait Section {
    type Static;
    type Dynamic;

    /// Extracts the static sub-parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the section is not ready to be used, for
    /// example when it needs a grid that has not been attached.
    fn build_static_params(&self) -> Result<Self::Static, ConfigError>;

    /// Resolves the dynamic sub-parameters at time `t`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamsError`] if a field cannot be evaluated or a sampled
    /// value fails validation. The section itself is never modified.
    fn build_dynamic_params(&self, t: f64) -> Result<Self::Dynamic, ParamsError>;
}

/// Builds the time series for `field`, naming it in any error.
pub(crate) fn series(field: &'static str, input: ScalarInput) -> Result<TimeSeries, ConfigError> {
    TimeSeries::try_from(input).map_err(|source| ConfigError::TimeSeries { field, source })
}

/// Builds the switch for `field`, naming it in any error.
pub(crate) fn switch(field: &'static str, input: SwitchInput) -> Result<SwitchSeries, ConfigError> {
    SwitchSeries::try_from(input).map_err(|source| ConfigError::TimeSeries { field, source })
}

/// Builds the spatial field for `field`, naming it in any error.
pub(crate) fn profile(field: &'static str, input: ProfileInput) -> Result<SpatialField, ConfigError> {
    SpatialField::try_from(input).map_err(|source| ConfigError::Profile { field, source })
}
