use rampup_core::{
    ScalarInput, TimeSeries,
    constraint::{NonNegative, UnitInterval},
};
use serde::{Deserialize, Serialize};
use uom::si::{f64::Power, power::watt};

use crate::{
    ConfigError, ParamsError, Section,
    sample::{sample, sample_checked},
    section::series,
};

use super::SourceMode;

pub const SOURCE_NAME: &str = "generic_heat";

/// Raw `generic_heat` source: external heating with a Gaussian radial
/// profile, split between ions and electrons.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenericHeatInput {
    pub mode: SourceMode,
    pub gaussian_location: ScalarInput,
    pub gaussian_width: ScalarInput,
    /// Total heating power in W.
    #[serde(rename = "P_total")]
    pub p_total: ScalarInput,
    pub electron_heat_fraction: ScalarInput,
}

impl Default for GenericHeatInput {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            gaussian_location: 0.0.into(),
            gaussian_width: 0.25.into(),
            p_total: 120e6.into(),
            electron_heat_fraction: 0.66666.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericHeat {
    mode: SourceMode,
    gaussian_location: TimeSeries,
    gaussian_width: TimeSeries,
    p_total: TimeSeries,
    electron_heat_fraction: TimeSeries,
}

impl TryFrom<GenericHeatInput> for GenericHeat {
    type Error = ConfigError;

    fn try_from(input: GenericHeatInput) -> Result<Self, Self::Error> {
        Ok(Self {
            mode: input.mode,
            gaussian_location: series("gaussian_location", input.gaussian_location)?,
            gaussian_width: series("gaussian_width", input.gaussian_width)?,
            p_total: series("P_total", input.p_total)?,
            electron_heat_fraction: series(
                "electron_heat_fraction",
                input.electron_heat_fraction,
            )?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StaticGenericHeat {
    pub mode: SourceMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicGenericHeat {
    pub gaussian_location: f64,
    pub gaussian_width: f64,
    #[serde(rename = "P_total")]
    pub p_total: Power,
    pub electron_heat_fraction: f64,
}

impl Section for GenericHeat {
    type Static = StaticGenericHeat;
    type Dynamic = DynamicGenericHeat;

    fn build_static_params(&self) -> Result<Self::Static, ConfigError> {
        Ok(StaticGenericHeat { mode: self.mode })
    }

    fn build_dynamic_params(&self, t: f64) -> Result<Self::Dynamic, ParamsError> {
        Ok(DynamicGenericHeat {
            gaussian_location: sample(&self.gaussian_location, "gaussian_location", t)?,
            gaussian_width: sample_checked::<NonNegative>(
                &self.gaussian_width,
                SOURCE_NAME,
                "gaussian_width",
                t,
            )?,
            p_total: Power::new::<watt>(sample(&self.p_total, "P_total", t)?),
            electron_heat_fraction: sample_checked::<UnitInterval>(
                &self.electron_heat_fraction,
                SOURCE_NAME,
                "electron_heat_fraction",
                t,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rampup_core::constraint::ConstraintError;
    use serde_json::json;

    #[test]
    fn power_ramp_in_watts() {
        let input: GenericHeatInput = serde_json::from_value(json!({
            "P_total": {"0.0": 0.0, "10.0": 20e6},
        }))
        .unwrap();
        let source = GenericHeat::try_from(input).unwrap();

        let dynamic = source.build_dynamic_params(5.0).unwrap();
        assert_relative_eq!(dynamic.p_total.get::<watt>(), 10e6);
        assert_relative_eq!(dynamic.electron_heat_fraction, 0.66666);
    }

    #[test]
    fn negative_electron_fraction_is_below_minimum() {
        let input = GenericHeatInput {
            electron_heat_fraction: (-0.1).into(),
            ..GenericHeatInput::default()
        };
        let source = GenericHeat::try_from(input).unwrap();

        let err = source.build_dynamic_params(0.0).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().reason,
            ConstraintError::BelowMinimum
        );
    }
}
