use rampup_core::{
    ScalarInput, TimeSeries,
    constraint::{NonNegative, UnitInterval},
};
use serde::{Deserialize, Serialize};
use uom::si::{electric_current::megaampere, f64::ElectricCurrent};

use crate::{
    ConfigError, ParamsError, Section,
    sample::{sample, sample_checked},
    section::series,
};

use super::SourceMode;

pub const SOURCE_NAME: &str = "generic_current";

/// Raw `generic_current` source: an externally driven current with a
/// Gaussian radial profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenericCurrentInput {
    pub mode: SourceMode,
    pub gaussian_location: ScalarInput,
    pub gaussian_width: ScalarInput,
    /// Total driven current in MA, used when `use_absolute_current` is set.
    #[serde(rename = "I_generic")]
    pub i_generic: ScalarInput,
    pub fraction_of_total_current: ScalarInput,
    pub use_absolute_current: bool,
}

impl Default for GenericCurrentInput {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            gaussian_location: 0.4.into(),
            gaussian_width: 0.05.into(),
            i_generic: 3.0.into(),
            fraction_of_total_current: 0.2.into(),
            use_absolute_current: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericCurrent {
    mode: SourceMode,
    gaussian_location: TimeSeries,
    gaussian_width: TimeSeries,
    i_generic: TimeSeries,
    fraction_of_total_current: TimeSeries,
    use_absolute_current: bool,
}

impl TryFrom<GenericCurrentInput> for GenericCurrent {
    type Error = ConfigError;

    fn try_from(input: GenericCurrentInput) -> Result<Self, Self::Error> {
        Ok(Self {
            mode: input.mode,
            gaussian_location: series("gaussian_location", input.gaussian_location)?,
            gaussian_width: series("gaussian_width", input.gaussian_width)?,
            i_generic: series("I_generic", input.i_generic)?,
            fraction_of_total_current: series(
                "fraction_of_total_current",
                input.fraction_of_total_current,
            )?,
            use_absolute_current: input.use_absolute_current,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StaticGenericCurrent {
    pub mode: SourceMode,
    pub use_absolute_current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicGenericCurrent {
    pub gaussian_location: f64,
    pub gaussian_width: f64,
    #[serde(rename = "I_generic")]
    pub i_generic: ElectricCurrent,
    pub fraction_of_total_current: f64,
}

impl Section for GenericCurrent {
    type Static = StaticGenericCurrent;
    type Dynamic = DynamicGenericCurrent;

    fn build_static_params(&self) -> Result<Self::Static, ConfigError> {
        Ok(StaticGenericCurrent {
            mode: self.mode,
            use_absolute_current: self.use_absolute_current,
        })
    }

    fn build_dynamic_params(&self, t: f64) -> Result<Self::Dynamic, ParamsError> {
        Ok(DynamicGenericCurrent {
            gaussian_location: sample(&self.gaussian_location, "gaussian_location", t)?,
            gaussian_width: sample_checked::<NonNegative>(
                &self.gaussian_width,
                SOURCE_NAME,
                "gaussian_width",
                t,
            )?,
            i_generic: ElectricCurrent::new::<megaampere>(sample(&self.i_generic, "I_generic", t)?),
            fraction_of_total_current: sample_checked::<UnitInterval>(
                &self.fraction_of_total_current,
                SOURCE_NAME,
                "fraction_of_total_current",
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

    fn source(input: serde_json::Value) -> GenericCurrent {
        let input: GenericCurrentInput = serde_json::from_value(input).unwrap();
        GenericCurrent::try_from(input).unwrap()
    }

    #[test]
    fn negative_width_fails_only_where_sampled() {
        let source = source(json!({"gaussian_width": {"0.0": 1.0, "1.0": -1.0}}));

        assert_relative_eq!(source.build_dynamic_params(0.0).unwrap().gaussian_width, 1.0);
        assert_relative_eq!(source.build_dynamic_params(0.5).unwrap().gaussian_width, 0.0);

        let err = source.build_dynamic_params(1.0).unwrap_err();
        let validation = err.as_validation().unwrap();
        assert_eq!(validation.section, SOURCE_NAME);
        assert_eq!(validation.field, "gaussian_width");
        assert_relative_eq!(validation.value, -1.0);
        assert_relative_eq!(validation.time, 1.0);
        assert_eq!(validation.reason, ConstraintError::Negative);
    }

    #[test]
    fn current_fraction_must_be_a_fraction() {
        let source = source(json!({"fraction_of_total_current": {"0.0": 0.5, "2.0": 1.5}}));

        assert!(source.build_dynamic_params(1.0).is_ok());
        let err = source.build_dynamic_params(2.0).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().reason,
            ConstraintError::AboveMaximum
        );
    }

    #[test]
    fn defaults() {
        let source = source(json!({}));

        let statics = source.build_static_params().unwrap();
        assert_eq!(statics.mode, SourceMode::ModelBased);
        assert!(!statics.use_absolute_current);

        let dynamic = source.build_dynamic_params(0.0).unwrap();
        assert_relative_eq!(dynamic.gaussian_location, 0.4);
        assert_relative_eq!(dynamic.gaussian_width, 0.05);
        assert_relative_eq!(dynamic.i_generic.get::<megaampere>(), 3.0);
        assert_relative_eq!(dynamic.fraction_of_total_current, 0.2);
    }
}
