use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::{
    Config, ConfigError, Section,
    numerics::StaticNumerics,
    pedestal::StaticPedestalParams,
    profile_conditions::StaticProfileConditions,
    sources::StaticSourceParams,
};

/// Parameters that determine the structure of the solver.
///
/// Two slices compare equal, and hash equally, exactly when a solver built
/// for one can be reused for the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StaticParamsSlice {
    pub grid_size: usize,
    pub profile_conditions: StaticProfileConditions,
    pub pedestal: StaticPedestalParams,
    pub sources: BTreeMap<&'static str, StaticSourceParams>,
    pub numerics: StaticNumerics,
}

/// Extracts the static parameters of `config`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingGrid`] if no grid has been attached.
pub fn build_static_params_from_config(config: &Config) -> Result<StaticParamsSlice, ConfigError> {
    let grid = config.require_grid()?;

    let slice = StaticParamsSlice {
        grid_size: grid.len(),
        profile_conditions: config.profile_conditions().build_static_params()?,
        pedestal: config.pedestal().build_static_params()?,
        sources: config.sources().build_static_params()?,
        numerics: config.numerics().build_static_params()?,
    };

    debug!(grid_size = slice.grid_size, "static parameters built");
    Ok(slice)
}

#[cfg(test)]
mod tests {
    use std::hash::{DefaultHasher, Hash, Hasher};

    use serde_json::json;

    use super::*;
    use crate::{Grid, pedestal::PedestalModelKind};

    fn config(input: serde_json::Value, cells: usize) -> Config {
        let mut config: Config = serde_json::from_value(input).unwrap();
        config.set_grid(&Grid::uniform(cells).unwrap()).unwrap();
        config
    }

    fn hash_of(slice: &StaticParamsSlice) -> u64 {
        let mut hasher = DefaultHasher::new();
        slice.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equal_configs_give_equal_slices() {
        let input = json!({
            "profile_conditions": {"T_i_right_bc": 0.2},
            "pedestal": {"pedestal_model": "set_T_ped_n_ped"},
            "sources": {"generic_heat": {}},
        });
        let a = build_static_params_from_config(&config(input.clone(), 8)).unwrap();
        let b = build_static_params_from_config(&config(input, 8)).unwrap();

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(a.pedestal.model, PedestalModelKind::SetTpedNped);
        assert!(a.profile_conditions.t_i_right_bc_is_absolute);
    }

    #[test]
    fn dynamic_only_changes_keep_the_slice() {
        let a = build_static_params_from_config(&config(json!({}), 4)).unwrap();
        let b = build_static_params_from_config(&config(
            json!({"profile_conditions": {"Ip": {"0": 5.0, "10": 15.0}}}),
            4,
        ))
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn structural_changes_change_the_slice() {
        let base = build_static_params_from_config(&config(json!({}), 4)).unwrap();

        let finer = build_static_params_from_config(&config(json!({}), 5)).unwrap();
        assert_ne!(base, finer);

        let absolute = build_static_params_from_config(&config(
            json!({"profile_conditions": {"n_e_right_bc": 0.3e20}}),
            4,
        ))
        .unwrap();
        assert_ne!(base, absolute);
    }

    #[test]
    fn grid_is_required() {
        let config = Config::from_input(crate::ConfigInput::default()).unwrap();
        assert!(matches!(
            build_static_params_from_config(&config),
            Err(ConfigError::MissingGrid { .. })
        ));
    }
}
