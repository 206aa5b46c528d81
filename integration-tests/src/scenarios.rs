use std::error::Error;

use rampup_params::{Config, Grid};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// A current ramp-up: rising plasma current, a heating ramp, an explicit ion
/// temperature boundary, and a stepped edge density given as a Greenwald
/// fraction. The electron temperature boundary is left to follow its profile.
pub const RAMP_UP_JSON: &str = r#"{
    "profile_conditions": {
        "Ip": {"0": 3.0, "80": 10.5},
        "T_i": {"0": {"0": 1.0, "1": 2.0}},
        "T_i_right_bc": {"0": 2.0, "4": 4.0},
        "T_e": {"0": {"0": 6.0, "1": 0.2}, "10": {"0": 8.0, "1": 0.4}},
        "n_e_nbar_is_fGW": true,
        "nbar": 0.8,
        "n_e_right_bc": [{"5": 0.6, "7": 0.8}, "step"],
        "n_e_right_bc_is_fGW": true
    },
    "pedestal": {
        "pedestal_model": "set_T_ped_n_ped",
        "set_pedestal": {"0": true, "1": false},
        "T_i_ped": 4.5
    },
    "sources": {
        "generic_current": {"gaussian_width": {"0": 0.1, "10": 0.2}},
        "generic_heat": {"P_total": 2.0e7}
    },
    "numerics": {
        "t_final": 80.0,
        "evolve_current": true
    }
}"#;

/// [`RAMP_UP_JSON`] written as YAML.
pub const RAMP_UP_YAML: &str = r"
profile_conditions:
  Ip: {0: 3.0, 80: 10.5}
  T_i: {0: {0: 1.0, 1: 2.0}}
  T_i_right_bc: {0: 2.0, 4: 4.0}
  T_e:
    0: {0: 6.0, 1: 0.2}
    10: {0: 8.0, 1: 0.4}
  n_e_nbar_is_fGW: true
  nbar: 0.8
  n_e_right_bc: [{5: 0.6, 7: 0.8}, step]
  n_e_right_bc_is_fGW: true
pedestal:
  pedestal_model: set_T_ped_n_ped
  set_pedestal: {0: true, 1: false}
  T_i_ped: 4.5
sources:
  generic_current:
    gaussian_width: {0: 0.1, 10: 0.2}
  generic_heat:
    P_total: 2.0e+7
numerics:
  t_final: 80.0
  evolve_current: true
";

/// [`RAMP_UP_JSON`] written as TOML.
pub const RAMP_UP_TOML: &str = r#"
[profile_conditions]
Ip = { "0" = 3.0, "80" = 10.5 }
T_i = { "0" = { "0" = 1.0, "1" = 2.0 } }
T_i_right_bc = { "0" = 2.0, "4" = 4.0 }
T_e = { "0" = { "0" = 6.0, "1" = 0.2 }, "10" = { "0" = 8.0, "1" = 0.4 } }
n_e_nbar_is_fGW = true
nbar = 0.8
n_e_right_bc = [{ "5" = 0.6, "7" = 0.8 }, "step"]
n_e_right_bc_is_fGW = true

[pedestal]
pedestal_model = "set_T_ped_n_ped"
set_pedestal = { "0" = true, "1" = false }
T_i_ped = 4.5

[sources.generic_current]
gaussian_width = { "0" = 0.1, "10" = 0.2 }

[sources.generic_heat]
P_total = 2.0e7

[numerics]
t_final = 80.0
evolve_current = true
"#;

/// A configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Yaml, Format::Toml];

    /// The ramp-up scenario in this format.
    #[must_use]
    pub fn ramp_up(self) -> &'static str {
        match self {
            Format::Json => RAMP_UP_JSON,
            Format::Yaml => RAMP_UP_YAML,
            Format::Toml => RAMP_UP_TOML,
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(self, text: &str) -> Result<T, Box<dyn Error>> {
        Ok(match self {
            Format::Json => serde_json::from_str(text)?,
            Format::Yaml => serde_yaml::from_str(text)?,
            Format::Toml => toml::from_str(text)?,
        })
    }
}

/// Parses and validates a configuration.
///
/// # Errors
///
/// Returns the parser's error, which wraps any validation failure.
pub fn load(format: Format, text: &str) -> Result<Config, Box<dyn Error>> {
    format.parse(text)
}

/// Parses a configuration and attaches a uniform grid of `cells` cells.
///
/// # Errors
///
/// Returns an error if parsing, validation, or grid attachment fails.
pub fn load_with_grid(format: Format, text: &str, cells: usize) -> Result<Config, Box<dyn Error>> {
    let mut config = load(format, text)?;
    config.set_grid(&Grid::uniform(cells)?)?;
    Ok(config)
}

/// Routes `tracing` output to the test harness, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
