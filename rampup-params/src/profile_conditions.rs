//! Plasma profiles and their boundary conditions.

use ndarray::Array1;
use rampup_core::{Knots, ScalarInput, TimeSeries};
use serde::{Deserialize, Serialize, Serializer};
use tracing::trace;
use uom::si::{electric_current::megaampere, f64::ElectricCurrent};

use crate::{
    ConfigError, Grid, ParamsError, ProfileInput, Section, SpatialField,
    resolver::{FieldResolver, FieldSpec, Origin, Resolution},
    sample::sample,
    section::{profile, series},
};

/// Raw `profile_conditions` section as authored by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConditionsInput {
    /// Total plasma current in MA.
    #[serde(rename = "Ip")]
    pub ip: ScalarInput,
    #[serde(rename = "T_i")]
    pub t_i: ProfileInput,
    #[serde(rename = "T_i_right_bc")]
    pub t_i_right_bc: Option<ScalarInput>,
    #[serde(rename = "T_e")]
    pub t_e: ProfileInput,
    #[serde(rename = "T_e_right_bc")]
    pub t_e_right_bc: Option<ScalarInput>,
    pub n_e: ProfileInput,
    pub n_e_right_bc: Option<ScalarInput>,
    #[serde(rename = "n_e_nbar_is_fGW")]
    pub n_e_nbar_is_fgw: bool,
    #[serde(rename = "n_e_right_bc_is_fGW")]
    pub n_e_right_bc_is_fgw: bool,
    pub nbar: ScalarInput,
    pub normalize_n_e_to_nbar: bool,
    pub current_profile_nu: f64,
}

impl Default for ProfileConditionsInput {
    fn default() -> Self {
        Self {
            ip: 15.0.into(),
            t_i: radial(15.0, 1.0),
            t_i_right_bc: None,
            t_e: radial(15.0, 1.0),
            t_e_right_bc: None,
            n_e: radial(1.2e20, 0.8e20),
            n_e_right_bc: None,
            n_e_nbar_is_fgw: false,
            n_e_right_bc_is_fgw: false,
            nbar: 0.85e20.into(),
            normalize_n_e_to_nbar: false,
            current_profile_nu: 3.0,
        }
    }
}

/// A time-independent profile going linearly from `core` to `edge`.
fn radial(core: f64, edge: f64) -> ProfileInput {
    let profile: Knots<f64> = [(0.0, core), (1.0, edge)].into_iter().collect();
    ProfileInput::Radial([(0.0, profile)].into_iter().collect())
}

#[derive(Debug, Clone, PartialEq)]
struct BoundaryCondition {
    name: &'static str,
    series: Option<TimeSeries>,
    resolution: Resolution,
}

/// Validated profile conditions.
///
/// Each `*_right_bc` may be left unset, in which case it takes the value of
/// its profile at the edge of the domain, and `n_e_right_bc_is_fGW` takes the
/// value of `n_e_nbar_is_fGW`. These fallbacks are resolved once, here.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConditions {
    ip: TimeSeries,
    t_i: SpatialField,
    t_i_right_bc: BoundaryCondition,
    t_e: SpatialField,
    t_e_right_bc: BoundaryCondition,
    n_e: SpatialField,
    n_e_right_bc: BoundaryCondition,
    n_e_nbar_is_fgw: bool,
    nbar: TimeSeries,
    normalize_n_e_to_nbar: bool,
    current_profile_nu: f64,
}

impl ProfileConditions {
    /// Attaches `grid` to every profile.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a profile does not fit the grid.
    pub fn set_grid(&mut self, grid: &Grid) -> Result<(), ConfigError> {
        self.t_i.set_grid(grid, "T_i")?;
        self.t_e.set_grid(grid, "T_e")?;
        self.n_e.set_grid(grid, "n_e")
    }

    fn profile(&self, name: &'static str) -> Result<&SpatialField, ConfigError> {
        match name {
            "T_i" => Ok(&self.t_i),
            "T_e" => Ok(&self.t_e),
            "n_e" => Ok(&self.n_e),
            _ => Err(ConfigError::UnresolvedDependency {
                field: name,
                depends_on: name,
            }),
        }
    }

    fn boundary_value(&self, bc: &BoundaryCondition, t: f64) -> Result<f64, ParamsError> {
        match (&bc.series, bc.resolution.origin) {
            (Some(series), _) => sample(series, bc.name, t),
            (None, Origin::Inherited { from }) => self.profile(from)?.edge_value_at(t, from),
            (None, Origin::Explicit) => Err(ConfigError::UnresolvedDependency {
                field: bc.name,
                depends_on: bc.name,
            }
            .into()),
        }
    }
}

impl TryFrom<ProfileConditionsInput> for ProfileConditions {
    type Error = ConfigError;

    fn try_from(input: ProfileConditionsInput) -> Result<Self, Self::Error> {
        let t_i_right_bc = input
            .t_i_right_bc
            .map(|bc| series("T_i_right_bc", bc))
            .transpose()?;
        let t_e_right_bc = input
            .t_e_right_bc
            .map(|bc| series("T_e_right_bc", bc))
            .transpose()?;
        let n_e_right_bc = input
            .n_e_right_bc
            .map(|bc| series("n_e_right_bc", bc))
            .transpose()?;

        let resolutions = FieldResolver::new()
            .with(FieldSpec::value("T_i", None))
            .with(FieldSpec::with_fallback(
                "T_i_right_bc",
                t_i_right_bc.is_some(),
                None,
                "T_i",
            ))
            .with(FieldSpec::value("T_e", None))
            .with(FieldSpec::with_fallback(
                "T_e_right_bc",
                t_e_right_bc.is_some(),
                None,
                "T_e",
            ))
            .with(FieldSpec::value("n_e", Some(input.n_e_nbar_is_fgw)))
            .with(FieldSpec::with_fallback(
                "n_e_right_bc",
                n_e_right_bc.is_some(),
                Some(input.n_e_right_bc_is_fgw),
                "n_e",
            ))
            .resolve()?;

        let boundary = |name: &'static str, series: Option<TimeSeries>| -> Result<_, ConfigError> {
            Ok(BoundaryCondition {
                name,
                series,
                resolution: resolutions.get(name)?,
            })
        };

        Ok(Self {
            ip: series("Ip", input.ip)?,
            t_i: profile("T_i", input.t_i)?,
            t_i_right_bc: boundary("T_i_right_bc", t_i_right_bc)?,
            t_e: profile("T_e", input.t_e)?,
            t_e_right_bc: boundary("T_e_right_bc", t_e_right_bc)?,
            n_e: profile("n_e", input.n_e)?,
            n_e_right_bc: boundary("n_e_right_bc", n_e_right_bc)?,
            n_e_nbar_is_fgw: input.n_e_nbar_is_fgw,
            nbar: series("nbar", input.nbar)?,
            normalize_n_e_to_nbar: input.normalize_n_e_to_nbar,
            current_profile_nu: input.current_profile_nu,
        })
    }
}

/// Profile conditions that change the structure of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StaticProfileConditions {
    #[serde(rename = "T_i_right_bc_is_absolute")]
    pub t_i_right_bc_is_absolute: bool,
    #[serde(rename = "T_e_right_bc_is_absolute")]
    pub t_e_right_bc_is_absolute: bool,
    pub n_e_right_bc_is_absolute: bool,
    #[serde(rename = "n_e_nbar_is_fGW")]
    pub n_e_nbar_is_fgw: bool,
    #[serde(rename = "n_e_right_bc_is_fGW")]
    pub n_e_right_bc_is_fgw: bool,
    pub normalize_n_e_to_nbar: bool,
}

/// Profile conditions resolved at one time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicProfileConditions {
    #[serde(rename = "Ip")]
    pub ip: ElectricCurrent,
    #[serde(rename = "T_i", serialize_with = "as_sequence")]
    pub t_i: Array1<f64>,
    #[serde(rename = "T_i_right_bc")]
    pub t_i_right_bc: f64,
    #[serde(rename = "T_e", serialize_with = "as_sequence")]
    pub t_e: Array1<f64>,
    #[serde(rename = "T_e_right_bc")]
    pub t_e_right_bc: f64,
    #[serde(serialize_with = "as_sequence")]
    pub n_e: Array1<f64>,
    pub n_e_right_bc: f64,
    #[serde(rename = "n_e_nbar_is_fGW")]
    pub n_e_nbar_is_fgw: bool,
    #[serde(rename = "n_e_right_bc_is_fGW")]
    pub n_e_right_bc_is_fgw: bool,
    pub nbar: f64,
    pub current_profile_nu: f64,
}

fn as_sequence<S: Serializer>(values: &Array1<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values)
}

impl Section for ProfileConditions {
    type Static = StaticProfileConditions;
    type Dynamic = DynamicProfileConditions;

    fn build_static_params(&self) -> Result<Self::Static, ConfigError> {
        for (field, spatial) in [("T_i", &self.t_i), ("T_e", &self.t_e), ("n_e", &self.n_e)] {
            if !spatial.has_grid() {
                return Err(ConfigError::MissingGrid { field });
            }
        }

        Ok(StaticProfileConditions {
            t_i_right_bc_is_absolute: self.t_i_right_bc.resolution.is_absolute(),
            t_e_right_bc_is_absolute: self.t_e_right_bc.resolution.is_absolute(),
            n_e_right_bc_is_absolute: self.n_e_right_bc.resolution.is_absolute(),
            n_e_nbar_is_fgw: self.n_e_nbar_is_fgw,
            n_e_right_bc_is_fgw: self.n_e_right_bc.resolution.flag,
            normalize_n_e_to_nbar: self.normalize_n_e_to_nbar,
        })
    }

    fn build_dynamic_params(&self, t: f64) -> Result<Self::Dynamic, ParamsError> {
        trace!(t, "resolving profile conditions");

        Ok(DynamicProfileConditions {
            ip: ElectricCurrent::new::<megaampere>(sample(&self.ip, "Ip", t)?),
            t_i: self.t_i.value_at(t, "T_i")?,
            t_i_right_bc: self.boundary_value(&self.t_i_right_bc, t)?,
            t_e: self.t_e.value_at(t, "T_e")?,
            t_e_right_bc: self.boundary_value(&self.t_e_right_bc, t)?,
            n_e: self.n_e.value_at(t, "n_e")?,
            n_e_right_bc: self.boundary_value(&self.n_e_right_bc, t)?,
            n_e_nbar_is_fgw: self.n_e_nbar_is_fgw,
            n_e_right_bc_is_fgw: self.n_e_right_bc.resolution.flag,
            nbar: sample(&self.nbar, "nbar", t)?,
            current_profile_nu: self.current_profile_nu,
        })
    }
}
