use rampup_core::{ScalarInput, TimeSeries, constraint::NonNegative};
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, ParamsError, Section,
    sample::{sample, sample_checked},
    section::series,
};

use super::SourceMode;

pub const SOURCE_NAME: &str = "gas_puff";

/// Raw `gas_puff` source: particles injected at the edge, decaying inwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GasPuffInput {
    pub mode: SourceMode,
    pub puff_decay_length: ScalarInput,
    /// Total particle source in particles per second.
    #[serde(rename = "S_total")]
    pub s_total: ScalarInput,
}

impl Default for GasPuffInput {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            puff_decay_length: 0.05.into(),
            s_total: 1e22.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GasPuff {
    mode: SourceMode,
    puff_decay_length: TimeSeries,
    s_total: TimeSeries,
}

impl TryFrom<GasPuffInput> for GasPuff {
    type Error = ConfigError;

    fn try_from(input: GasPuffInput) -> Result<Self, Self::Error> {
        Ok(Self {
            mode: input.mode,
            puff_decay_length: series("puff_decay_length", input.puff_decay_length)?,
            s_total: series("S_total", input.s_total)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StaticGasPuff {
    pub mode: SourceMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicGasPuff {
    pub puff_decay_length: f64,
    #[serde(rename = "S_total")]
    pub s_total: f64,
}

impl Section for GasPuff {
    type Static = StaticGasPuff;
    type Dynamic = DynamicGasPuff;

    fn build_static_params(&self) -> Result<Self::Static, ConfigError> {
        Ok(StaticGasPuff { mode: self.mode })
    }

    fn build_dynamic_params(&self, t: f64) -> Result<Self::Dynamic, ParamsError> {
        Ok(DynamicGasPuff {
            puff_decay_length: sample_checked::<NonNegative>(
                &self.puff_decay_length,
                SOURCE_NAME,
                "puff_decay_length",
                t,
            )?,
            s_total: sample(&self.s_total, "S_total", t)?,
        })
    }
}
