//! Time stepping and equation selection.

use rampup_core::{ScalarInput, TimeSeries, constraint::NonNegative};
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, ParamsError, Section,
    sample::sample_checked,
    section::series,
};

/// Raw `numerics` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumericsInput {
    pub t_initial: f64,
    pub t_final: f64,
    pub fixed_dt: f64,
    pub evolve_ion_heat: bool,
    pub evolve_electron_heat: bool,
    pub evolve_current: bool,
    pub evolve_density: bool,
    pub resistivity_multiplier: ScalarInput,
    pub density_reference: f64,
}

impl Default for NumericsInput {
    fn default() -> Self {
        Self {
            t_initial: 0.0,
            t_final: 5.0,
            fixed_dt: 1e-1,
            evolve_ion_heat: true,
            evolve_electron_heat: true,
            evolve_current: false,
            evolve_density: false,
            resistivity_multiplier: 1.0.into(),
            density_reference: 1e20,
        }
    }
}

/// Validated numerics.
#[derive(Debug, Clone, PartialEq)]
pub struct Numerics {
    t_initial: f64,
    t_final: f64,
    fixed_dt: f64,
    equations: StaticNumerics,
    resistivity_multiplier: TimeSeries,
    density_reference: f64,
}

impl TryFrom<NumericsInput> for Numerics {
    type Error = ConfigError;

    fn try_from(input: NumericsInput) -> Result<Self, Self::Error> {
        if !input.t_initial.is_finite() || !input.t_final.is_finite() {
            return Err(ConfigError::InvalidNumerics {
                reason: "simulation times must be finite",
            });
        }
        if input.t_final <= input.t_initial {
            return Err(ConfigError::InvalidNumerics {
                reason: "t_final must be greater than t_initial",
            });
        }
        if !(input.fixed_dt > 0.0 && input.fixed_dt.is_finite()) {
            return Err(ConfigError::InvalidNumerics {
                reason: "fixed_dt must be positive",
            });
        }
        if !(input.density_reference > 0.0 && input.density_reference.is_finite()) {
            return Err(ConfigError::InvalidNumerics {
                reason: "density_reference must be positive",
            });
        }

        Ok(Self {
            t_initial: input.t_initial,
            t_final: input.t_final,
            fixed_dt: input.fixed_dt,
            equations: StaticNumerics {
                evolve_ion_heat: input.evolve_ion_heat,
                evolve_electron_heat: input.evolve_electron_heat,
                evolve_current: input.evolve_current,
                evolve_density: input.evolve_density,
            },
            resistivity_multiplier: series(
                "resistivity_multiplier",
                input.resistivity_multiplier,
            )?,
            density_reference: input.density_reference,
        })
    }
}

/// Which equations the solver evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StaticNumerics {
    pub evolve_ion_heat: bool,
    pub evolve_electron_heat: bool,
    pub evolve_current: bool,
    pub evolve_density: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicNumerics {
    pub t_initial: f64,
    pub t_final: f64,
    pub fixed_dt: f64,
    pub resistivity_multiplier: f64,
    pub density_reference: f64,
}

impl Section for Numerics {
    type Static = StaticNumerics;
    type Dynamic = DynamicNumerics;

    fn build_static_params(&self) -> Result<Self::Static, ConfigError> {
        Ok(self.equations)
    }

    fn build_dynamic_params(&self, t: f64) -> Result<Self::Dynamic, ParamsError> {
        Ok(DynamicNumerics {
            t_initial: self.t_initial,
            t_final: self.t_final,
            fixed_dt: self.fixed_dt,
            resistivity_multiplier: sample_checked::<NonNegative>(
                &self.resistivity_multiplier,
                "numerics",
                "resistivity_multiplier",
                t,
            )?,
            density_reference: self.density_reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn defaults_evolve_heat_only() {
        let numerics = Numerics::try_from(NumericsInput::default()).unwrap();

        let statics = numerics.build_static_params().unwrap();
        assert!(statics.evolve_ion_heat);
        assert!(statics.evolve_electron_heat);
        assert!(!statics.evolve_current);
        assert!(!statics.evolve_density);

        let dynamic = numerics.build_dynamic_params(2.0).unwrap();
        assert_relative_eq!(dynamic.t_final, 5.0);
        assert_relative_eq!(dynamic.resistivity_multiplier, 1.0);
    }

    #[test]
    fn time_range_must_be_increasing() {
        let input = NumericsInput {
            t_initial: 2.0,
            t_final: 2.0,
            ..NumericsInput::default()
        };
        assert!(matches!(
            Numerics::try_from(input),
            Err(ConfigError::InvalidNumerics { .. })
        ));
    }

    #[test]
    fn time_step_must_be_positive() {
        for fixed_dt in [0.0, -0.1, f64::NAN] {
            let input = NumericsInput {
                fixed_dt,
                ..NumericsInput::default()
            };
            assert!(Numerics::try_from(input).is_err(), "fixed_dt = {fixed_dt}");
        }
    }

    #[test]
    fn resistivity_multiplier_is_checked_when_sampled() {
        let input = NumericsInput {
            resistivity_multiplier: ScalarInput::Series(
                [(0.0, 1.0), (1.0, -1.0)].into_iter().collect(),
            ),
            ..NumericsInput::default()
        };
        let numerics = Numerics::try_from(input).unwrap();

        assert!(numerics.build_dynamic_params(0.25).is_ok());
        assert!(numerics.build_dynamic_params(1.0).is_err());
    }
}
