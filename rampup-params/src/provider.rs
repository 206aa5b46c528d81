use std::collections::BTreeMap;

use rampup_core::Component;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::{
    Config, ConfigError, ParamsError, Section,
    numerics::DynamicNumerics,
    pedestal::DynamicPedestalParams,
    profile_conditions::DynamicProfileConditions,
    sources::DynamicSourceParams,
};

/// Every time-dependent parameter, resolved at one time.
///
/// Each slice is built fresh and owns all of its data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicParamsSlice {
    pub t: f64,
    pub numerics: DynamicNumerics,
    pub profile_conditions: DynamicProfileConditions,
    pub pedestal: DynamicPedestalParams,
    pub sources: BTreeMap<&'static str, DynamicSourceParams>,
}

/// Produces a [`DynamicParamsSlice`] for any query time.
///
/// The provider takes its own copy of the configuration when it is created,
/// so later changes to that configuration do not affect it. Queries never
/// modify the provider and may run concurrently from several threads.
///
/// # Examples
///
/// ```
/// use rampup_core::Component;
/// use rampup_params::{Config, DynamicRuntimeParamsSliceProvider, Grid};
///
/// let mut config: Config = serde_json::from_str(
///     r#"{"profile_conditions": {"T_i_right_bc": {"0": 2.0, "4": 4.0}}}"#,
/// )
/// .unwrap();
/// config.set_grid(&Grid::uniform(4).unwrap()).unwrap();
///
/// let provider = DynamicRuntimeParamsSliceProvider::from_config(&config).unwrap();
/// assert_eq!(provider.call(1.0).unwrap().profile_conditions.t_i_right_bc, 2.5);
/// assert_eq!(provider.call(2.0).unwrap().profile_conditions.t_i_right_bc, 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct DynamicRuntimeParamsSliceProvider {
    config: Config,
}

impl DynamicRuntimeParamsSliceProvider {
    /// Creates a provider for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingGrid`] if no grid has been attached.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let grid = config.require_grid()?;
        debug!(nodes = grid.len(), "dynamic parameter provider created");
        Ok(Self {
            config: config.clone(),
        })
    }

    /// Resolves every section at time `t`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamsError`] if `t` cannot be evaluated or a sampled
    /// value fails validation. Only this query fails; the provider can still
    /// be queried at other times.
    #[instrument(skip(self), name = "dynamic_params")]
    pub fn slice_at(&self, t: f64) -> Result<DynamicParamsSlice, ParamsError> {
        let config = &self.config;

        let slice = DynamicParamsSlice {
            t,
            numerics: config.numerics().build_dynamic_params(t)?,
            profile_conditions: config.profile_conditions().build_dynamic_params(t)?,
            pedestal: config.pedestal().build_dynamic_params(t)?,
            sources: config.sources().build_dynamic_params(t)?,
        };

        trace!("slice resolved");
        Ok(slice)
    }
}

impl Component for DynamicRuntimeParamsSliceProvider {
    type Input = f64;
    type Output = DynamicParamsSlice;
    type Error = ParamsError;

    fn call(&self, t: Self::Input) -> Result<Self::Output, Self::Error> {
        self.slice_at(t)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use serde_json::json;

    use super::*;
    use crate::Grid;

    fn provider(input: serde_json::Value) -> DynamicRuntimeParamsSliceProvider {
        let mut config: Config = serde_json::from_value(input).unwrap();
        config.set_grid(&Grid::uniform(4).unwrap()).unwrap();
        DynamicRuntimeParamsSliceProvider::from_config(&config).unwrap()
    }

    #[test]
    fn provider_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DynamicRuntimeParamsSliceProvider>();
    }

    #[test]
    fn repeated_queries_are_identical() {
        let provider = provider(json!({
            "profile_conditions": {"T_e": {"0": {"0": 3.0, "1": 1.0}, "5": {"0": 6.0, "1": 2.0}}},
            "sources": {"generic_current": {}},
        }));

        assert_eq!(provider.call(2.5).unwrap(), provider.call(2.5).unwrap());
    }

    #[test]
    fn provider_keeps_its_own_copy_of_the_config() {
        let mut config: Config =
            serde_json::from_value(json!({"profile_conditions": {"nbar": 0.5e20}})).unwrap();
        config.set_grid(&Grid::uniform(4).unwrap()).unwrap();
        let provider = DynamicRuntimeParamsSliceProvider::from_config(&config).unwrap();

        config.set_grid(&Grid::uniform(8).unwrap()).unwrap();

        let slice = provider.call(0.0).unwrap();
        assert_eq!(slice.profile_conditions.t_i.len(), 4);
        assert_relative_eq!(slice.profile_conditions.nbar, 0.5e20);
    }

    #[test]
    fn failed_query_does_not_poison_later_ones() {
        let provider = provider(json!({
            "sources": {"generic_current": {"gaussian_width": {"0": 1.0, "1": -1.0}}},
        }));

        assert!(provider.call(1.0).unwrap_err().as_validation().is_some());
        assert!(provider.call(0.0).is_ok());
    }

    #[test]
    fn missing_grid_fails_fast() {
        let config = Config::from_input(crate::ConfigInput::default()).unwrap();
        assert!(matches!(
            DynamicRuntimeParamsSliceProvider::from_config(&config),
            Err(ConfigError::MissingGrid { .. })
        ));
    }

    #[test]
    fn nan_time_is_an_interpolation_error() {
        let provider = provider(json!({}));
        assert!(matches!(
            provider.call(f64::NAN),
            Err(ParamsError::Interpolation { .. })
        ));
    }
}
