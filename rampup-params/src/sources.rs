//! Heat, particle, and current sources.
//!
//! The set of sources is closed. Each one is optional in the configuration,
//! and the sources that are present are keyed by name in both slices.

pub mod gas_puff;
pub mod generic_current;
pub mod generic_heat;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{ConfigError, ParamsError, Section};

use gas_puff::{DynamicGasPuff, GasPuff, GasPuffInput, StaticGasPuff};
use generic_current::{
    DynamicGenericCurrent, GenericCurrent, GenericCurrentInput, StaticGenericCurrent,
};
use generic_heat::{DynamicGenericHeat, GenericHeat, GenericHeatInput, StaticGenericHeat};

/// How a source is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceMode {
    /// The source is off and contributes nothing.
    Zero,
    /// The source is computed from its model.
    #[default]
    ModelBased,
}

/// Raw `sources` section. Omitted sources are disabled.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesInput {
    pub generic_current: Option<GenericCurrentInput>,
    pub gas_puff: Option<GasPuffInput>,
    pub generic_heat: Option<GenericHeatInput>,
}

/// One configured source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    GenericCurrent(GenericCurrent),
    GasPuff(GasPuff),
    GenericHeat(GenericHeat),
}

impl SourceConfig {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SourceConfig::GenericCurrent(_) => generic_current::SOURCE_NAME,
            SourceConfig::GasPuff(_) => gas_puff::SOURCE_NAME,
            SourceConfig::GenericHeat(_) => generic_heat::SOURCE_NAME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum StaticSourceParams {
    GenericCurrent(StaticGenericCurrent),
    GasPuff(StaticGasPuff),
    GenericHeat(StaticGenericHeat),
}

impl StaticSourceParams {
    #[must_use]
    pub fn mode(&self) -> SourceMode {
        match self {
            StaticSourceParams::GenericCurrent(params) => params.mode,
            StaticSourceParams::GasPuff(params) => params.mode,
            StaticSourceParams::GenericHeat(params) => params.mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DynamicSourceParams {
    GenericCurrent(DynamicGenericCurrent),
    GasPuff(DynamicGasPuff),
    GenericHeat(DynamicGenericHeat),
}

impl Section for SourceConfig {
    type Static = StaticSourceParams;
    type Dynamic = DynamicSourceParams;

    fn build_static_params(&self) -> Result<Self::Static, ConfigError> {
        Ok(match self {
            SourceConfig::GenericCurrent(source) => {
                StaticSourceParams::GenericCurrent(source.build_static_params()?)
            }
            SourceConfig::GasPuff(source) => {
                StaticSourceParams::GasPuff(source.build_static_params()?)
            }
            SourceConfig::GenericHeat(source) => {
                StaticSourceParams::GenericHeat(source.build_static_params()?)
            }
        })
    }

    fn build_dynamic_params(&self, t: f64) -> Result<Self::Dynamic, ParamsError> {
        Ok(match self {
            SourceConfig::GenericCurrent(source) => {
                DynamicSourceParams::GenericCurrent(source.build_dynamic_params(t)?)
            }
            SourceConfig::GasPuff(source) => {
                DynamicSourceParams::GasPuff(source.build_dynamic_params(t)?)
            }
            SourceConfig::GenericHeat(source) => {
                DynamicSourceParams::GenericHeat(source.build_dynamic_params(t)?)
            }
        })
    }
}

/// The configured sources, keyed by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sources {
    sources: BTreeMap<&'static str, SourceConfig>,
}

impl Sources {
    /// Returns the source called `name`, if it is configured.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn insert(&mut self, source: SourceConfig) {
        self.sources.insert(source.name(), source);
    }
}

impl TryFrom<SourcesInput> for Sources {
    type Error = ConfigError;

    fn try_from(input: SourcesInput) -> Result<Self, Self::Error> {
        let mut sources = Sources::default();
        if let Some(input) = input.generic_current {
            sources.insert(SourceConfig::GenericCurrent(input.try_into()?));
        }
        if let Some(input) = input.gas_puff {
            sources.insert(SourceConfig::GasPuff(input.try_into()?));
        }
        if let Some(input) = input.generic_heat {
            sources.insert(SourceConfig::GenericHeat(input.try_into()?));
        }
        Ok(sources)
    }
}

impl Section for Sources {
    type Static = BTreeMap<&'static str, StaticSourceParams>;
    type Dynamic = BTreeMap<&'static str, DynamicSourceParams>;

    fn build_static_params(&self) -> Result<Self::Static, ConfigError> {
        self.sources
            .iter()
            .map(|(&name, source)| -> Result<_, ConfigError> {
                Ok((name, source.build_static_params()?))
            })
            .collect()
    }

    fn build_dynamic_params(&self, t: f64) -> Result<Self::Dynamic, ParamsError> {
        self.sources
            .iter()
            .map(|(&name, source)| -> Result<_, ParamsError> {
                trace!(t, source = name, "resolving source");
                Ok((name, source.build_dynamic_params(t)?))
            })
            .collect()
    }
}
