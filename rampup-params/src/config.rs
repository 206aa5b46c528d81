use serde::Deserialize;
use tracing::debug;

use crate::{
    ConfigError, Grid,
    numerics::{Numerics, NumericsInput},
    pedestal::{PedestalConfig, PedestalInput},
    profile_conditions::{ProfileConditions, ProfileConditionsInput},
    sources::{Sources, SourcesInput},
};

/// Raw configuration as authored by the user.
///
/// Every section is optional and falls back to its defaults. Deserialize
/// this from any `serde` format, then validate it with [`Config::from_input`],
/// or deserialize a [`Config`] directly.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigInput {
    pub profile_conditions: ProfileConditionsInput,
    pub pedestal: PedestalInput,
    pub sources: SourcesInput,
    pub numerics: NumericsInput,
}

/// A validated configuration.
///
/// Time series are checked and boundary fallbacks resolved when the
/// configuration is built. Values that must satisfy a physical bound are
/// checked later, each time they are sampled.
///
/// A [`Grid`] must be attached with [`Config::set_grid`] before any
/// parameters can be built from the configuration.
///
/// # Examples
///
/// ```
/// use rampup_params::{Config, Grid};
///
/// let json = r#"{
///     "profile_conditions": {"T_i_right_bc": {"0": 2.0, "4": 4.0}},
///     "numerics": {"t_final": 10.0}
/// }"#;
///
/// let mut config: Config = serde_json::from_str(json).unwrap();
/// config.set_grid(&Grid::uniform(10).unwrap()).unwrap();
/// assert_eq!(config.grid().unwrap().len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ConfigInput")]
pub struct Config {
    profile_conditions: ProfileConditions,
    pedestal: PedestalConfig,
    sources: Sources,
    numerics: Numerics,
    grid: Option<Grid>,
}

impl Config {
    /// Validates a raw configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any time series is malformed, a boundary
    /// fallback cannot be resolved, or the numerics are inconsistent.
    pub fn from_input(input: ConfigInput) -> Result<Self, ConfigError> {
        let config = Self {
            profile_conditions: input.profile_conditions.try_into()?,
            pedestal: input.pedestal.try_into()?,
            sources: input.sources.try_into()?,
            numerics: input.numerics.try_into()?,
            grid: None,
        };

        debug!(
            pedestal = ?config.pedestal.kind(),
            sources = config.sources.len(),
            "configuration validated"
        );
        Ok(config)
    }

    /// Attaches `grid`, projecting every spatial field onto its nodes.
    ///
    /// Replaces any previously attached grid. On error the configuration is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a field does not fit the grid.
    pub fn set_grid(&mut self, grid: &Grid) -> Result<(), ConfigError> {
        let mut profile_conditions = self.profile_conditions.clone();
        profile_conditions.set_grid(grid)?;

        self.profile_conditions = profile_conditions;
        self.grid = Some(grid.clone());
        debug!(nodes = grid.len(), "grid attached");
        Ok(())
    }

    /// Returns the attached grid, if any.
    #[must_use]
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub(crate) fn require_grid(&self) -> Result<&Grid, ConfigError> {
        self.grid
            .as_ref()
            .ok_or(ConfigError::MissingGrid { field: "grid" })
    }

    #[must_use]
    pub fn profile_conditions(&self) -> &ProfileConditions {
        &self.profile_conditions
    }

    #[must_use]
    pub fn pedestal(&self) -> &PedestalConfig {
        &self.pedestal
    }

    #[must_use]
    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    #[must_use]
    pub fn numerics(&self) -> &Numerics {
        &self.numerics
    }
}

impl TryFrom<ConfigInput> for Config {
    type Error = ConfigError;

    fn try_from(input: ConfigInput) -> Result<Self, Self::Error> {
        Self::from_input(input)
    }
}
