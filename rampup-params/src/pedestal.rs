//! Pedestal models.
//!
//! The pedestal model is chosen once, in the configuration, and the choice is
//! static. Each model has its own set of time-dependent parameters, so the
//! dynamic result is an enum with one variant per model.

use rampup_core::{ScalarInput, SwitchInput, SwitchSeries, TimeSeries, constraint::NonNegative};
use serde::{Deserialize, Serialize};
use tracing::trace;
use uom::si::{f64::Pressure, pressure::pascal};

use crate::{
    ConfigError, ParamsError, Section,
    sample::{sample, sample_checked},
    section::{series, switch},
};

const SECTION: &str = "pedestal";

/// Raw `pedestal` section, tagged by `pedestal_model`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "pedestal_model")]
pub enum PedestalInput {
    #[serde(rename = "set_T_ped_n_ped")]
    SetTpedNped(SetTpedNpedInput),
    #[serde(rename = "set_P_ped_n_ped")]
    SetPpedNped(SetPpedNpedInput),
    #[default]
    #[serde(rename = "no_pedestal")]
    NoPedestal,
}

/// Pedestal set by its ion and electron temperatures and its density.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetTpedNpedInput {
    pub set_pedestal: SwitchInput,
    /// Ion temperature at the pedestal top in keV.
    #[serde(rename = "T_i_ped")]
    pub t_i_ped: ScalarInput,
    /// Electron temperature at the pedestal top in keV.
    #[serde(rename = "T_e_ped")]
    pub t_e_ped: ScalarInput,
    pub n_e_ped: ScalarInput,
    #[serde(rename = "n_e_ped_is_fGW")]
    pub n_e_ped_is_fgw: bool,
    pub rho_norm_ped_top: ScalarInput,
}

impl Default for SetTpedNpedInput {
    fn default() -> Self {
        Self {
            set_pedestal: false.into(),
            t_i_ped: 5.0.into(),
            t_e_ped: 5.0.into(),
            n_e_ped: 0.7e20.into(),
            n_e_ped_is_fgw: false,
            rho_norm_ped_top: 0.91.into(),
        }
    }
}

/// Pedestal set by its total pressure and its density.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetPpedNpedInput {
    pub set_pedestal: SwitchInput,
    /// Total pressure at the pedestal top in Pa.
    #[serde(rename = "P_ped")]
    pub p_ped: ScalarInput,
    pub n_e_ped: ScalarInput,
    #[serde(rename = "n_e_ped_is_fGW")]
    pub n_e_ped_is_fgw: bool,
    #[serde(rename = "T_i_T_e_ratio")]
    pub t_i_t_e_ratio: ScalarInput,
    pub rho_norm_ped_top: ScalarInput,
}

impl Default for SetPpedNpedInput {
    fn default() -> Self {
        Self {
            set_pedestal: false.into(),
            p_ped: 1e5.into(),
            n_e_ped: 0.7e20.into(),
            n_e_ped_is_fgw: false,
            t_i_t_e_ratio: 1.0.into(),
            rho_norm_ped_top: 0.91.into(),
        }
    }
}

/// Validated `set_T_ped_n_ped` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SetTpedNped {
    set_pedestal: SwitchSeries,
    t_i_ped: TimeSeries,
    t_e_ped: TimeSeries,
    n_e_ped: TimeSeries,
    n_e_ped_is_fgw: bool,
    rho_norm_ped_top: TimeSeries,
}

/// Validated `set_P_ped_n_ped` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SetPpedNped {
    set_pedestal: SwitchSeries,
    p_ped: TimeSeries,
    n_e_ped: TimeSeries,
    n_e_ped_is_fgw: bool,
    t_i_t_e_ratio: TimeSeries,
    rho_norm_ped_top: TimeSeries,
}

/// The configured pedestal model.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PedestalConfig {
    SetTpedNped(SetTpedNped),
    SetPpedNped(SetPpedNped),
    #[default]
    NoPedestal,
}

impl PedestalConfig {
    #[must_use]
    pub fn kind(&self) -> PedestalModelKind {
        match self {
            PedestalConfig::SetTpedNped(_) => PedestalModelKind::SetTpedNped,
            PedestalConfig::SetPpedNped(_) => PedestalModelKind::SetPpedNped,
            PedestalConfig::NoPedestal => PedestalModelKind::NoPedestal,
        }
    }
}

impl TryFrom<PedestalInput> for PedestalConfig {
    type Error = ConfigError;

    fn try_from(input: PedestalInput) -> Result<Self, Self::Error> {
        Ok(match input {
            PedestalInput::SetTpedNped(input) => PedestalConfig::SetTpedNped(SetTpedNped {
                set_pedestal: switch("set_pedestal", input.set_pedestal)?,
                t_i_ped: series("T_i_ped", input.t_i_ped)?,
                t_e_ped: series("T_e_ped", input.t_e_ped)?,
                n_e_ped: series("n_e_ped", input.n_e_ped)?,
                n_e_ped_is_fgw: input.n_e_ped_is_fgw,
                rho_norm_ped_top: series("rho_norm_ped_top", input.rho_norm_ped_top)?,
            }),
            PedestalInput::SetPpedNped(input) => PedestalConfig::SetPpedNped(SetPpedNped {
                set_pedestal: switch("set_pedestal", input.set_pedestal)?,
                p_ped: series("P_ped", input.p_ped)?,
                n_e_ped: series("n_e_ped", input.n_e_ped)?,
                n_e_ped_is_fgw: input.n_e_ped_is_fgw,
                t_i_t_e_ratio: series("T_i_T_e_ratio", input.t_i_t_e_ratio)?,
                rho_norm_ped_top: series("rho_norm_ped_top", input.rho_norm_ped_top)?,
            }),
            PedestalInput::NoPedestal => PedestalConfig::NoPedestal,
        })
    }
}

/// Which pedestal model is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PedestalModelKind {
    #[serde(rename = "set_T_ped_n_ped")]
    SetTpedNped,
    #[serde(rename = "set_P_ped_n_ped")]
    SetPpedNped,
    #[serde(rename = "no_pedestal")]
    NoPedestal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StaticPedestalParams {
    pub model: PedestalModelKind,
    #[serde(rename = "n_e_ped_is_fGW")]
    pub n_e_ped_is_fgw: bool,
}

/// Pedestal parameters resolved at one time, for the configured model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "pedestal_model")]
pub enum DynamicPedestalParams {
    #[serde(rename = "set_T_ped_n_ped")]
    SetTpedNped {
        set_pedestal: bool,
        #[serde(rename = "T_i_ped")]
        t_i_ped: f64,
        #[serde(rename = "T_e_ped")]
        t_e_ped: f64,
        n_e_ped: f64,
        #[serde(rename = "n_e_ped_is_fGW")]
        n_e_ped_is_fgw: bool,
        rho_norm_ped_top: f64,
    },
    #[serde(rename = "set_P_ped_n_ped")]
    SetPpedNped {
        set_pedestal: bool,
        #[serde(rename = "P_ped")]
        p_ped: Pressure,
        n_e_ped: f64,
        #[serde(rename = "n_e_ped_is_fGW")]
        n_e_ped_is_fgw: bool,
        #[serde(rename = "T_i_T_e_ratio")]
        t_i_t_e_ratio: f64,
        rho_norm_ped_top: f64,
    },
    #[serde(rename = "no_pedestal")]
    NoPedestal,
}

impl DynamicPedestalParams {
    /// Returns `true` if the pedestal is active at the sampled time.
    #[must_use]
    pub fn set_pedestal(&self) -> bool {
        match self {
            DynamicPedestalParams::SetTpedNped { set_pedestal, .. }
            | DynamicPedestalParams::SetPpedNped { set_pedestal, .. } => *set_pedestal,
            DynamicPedestalParams::NoPedestal => false,
        }
    }
}

fn set_pedestal_at(switch: &SwitchSeries, t: f64) -> Result<bool, ParamsError> {
    switch
        .value_at(t)
        .map_err(|source| ParamsError::Interpolation {
            field: "set_pedestal",
            time: t,
            source,
        })
}

impl Section for PedestalConfig {
    type Static = StaticPedestalParams;
    type Dynamic = DynamicPedestalParams;

    fn build_static_params(&self) -> Result<Self::Static, ConfigError> {
        let n_e_ped_is_fgw = match self {
            PedestalConfig::SetTpedNped(model) => model.n_e_ped_is_fgw,
            PedestalConfig::SetPpedNped(model) => model.n_e_ped_is_fgw,
            PedestalConfig::NoPedestal => false,
        };
        Ok(StaticPedestalParams {
            model: self.kind(),
            n_e_ped_is_fgw,
        })
    }

    fn build_dynamic_params(&self, t: f64) -> Result<Self::Dynamic, ParamsError> {
        trace!(t, model = ?self.kind(), "resolving pedestal");

        Ok(match self {
            PedestalConfig::SetTpedNped(model) => DynamicPedestalParams::SetTpedNped {
                set_pedestal: set_pedestal_at(&model.set_pedestal, t)?,
                t_i_ped: sample_checked::<NonNegative>(&model.t_i_ped, SECTION, "T_i_ped", t)?,
                t_e_ped: sample_checked::<NonNegative>(&model.t_e_ped, SECTION, "T_e_ped", t)?,
                n_e_ped: sample_checked::<NonNegative>(&model.n_e_ped, SECTION, "n_e_ped", t)?,
                n_e_ped_is_fgw: model.n_e_ped_is_fgw,
                rho_norm_ped_top: sample(&model.rho_norm_ped_top, "rho_norm_ped_top", t)?,
            },
            PedestalConfig::SetPpedNped(model) => DynamicPedestalParams::SetPpedNped {
                set_pedestal: set_pedestal_at(&model.set_pedestal, t)?,
                p_ped: Pressure::new::<pascal>(sample_checked::<NonNegative>(
                    &model.p_ped,
                    SECTION,
                    "P_ped",
                    t,
                )?),
                n_e_ped: sample_checked::<NonNegative>(&model.n_e_ped, SECTION, "n_e_ped", t)?,
                n_e_ped_is_fgw: model.n_e_ped_is_fgw,
                t_i_t_e_ratio: sample_checked::<NonNegative>(
                    &model.t_i_t_e_ratio,
                    SECTION,
                    "T_i_T_e_ratio",
                    t,
                )?,
                rho_norm_ped_top: sample(&model.rho_norm_ped_top, "rho_norm_ped_top", t)?,
            },
            PedestalConfig::NoPedestal => DynamicPedestalParams::NoPedestal,
        })
    }
}
