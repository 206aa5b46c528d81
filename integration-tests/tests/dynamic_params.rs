use approx::assert_relative_eq;
use integration_tests::{Format, init_tracing, load_with_grid};
use rampup_core::Component;
use rampup_params::{
    DynamicRuntimeParamsSliceProvider, build_static_params_from_config,
    pedestal::DynamicPedestalParams, sources::DynamicSourceParams,
};
use uom::si::{electric_current::megaampere, power::watt};

fn ramp_up() -> DynamicRuntimeParamsSliceProvider {
    init_tracing();
    let config = load_with_grid(Format::Json, Format::Json.ramp_up(), 4).unwrap();
    DynamicRuntimeParamsSliceProvider::from_config(&config).unwrap()
}

#[test]
fn explicit_boundary_is_interpolated_in_time() {
    let provider = ramp_up();

    assert_relative_eq!(provider.call(1.0).unwrap().profile_conditions.t_i_right_bc, 2.5);
    assert_relative_eq!(provider.call(2.0).unwrap().profile_conditions.t_i_right_bc, 3.0);
    assert_relative_eq!(provider.call(50.0).unwrap().profile_conditions.t_i_right_bc, 4.0);
}

#[test]
fn radial_profile_lands_on_cell_centres() {
    let slice = ramp_up().call(0.0).unwrap();

    let t_i = slice.profile_conditions.t_i.to_vec();
    for (actual, expected) in t_i.iter().zip([1.125, 1.375, 1.625, 1.875]) {
        assert_relative_eq!(*actual, expected);
    }
}

#[test]
fn unset_boundary_follows_the_profile_edge() {
    let provider = ramp_up();

    let slice = provider.call(5.0).unwrap();
    assert_relative_eq!(slice.profile_conditions.t_e_right_bc, 0.3, epsilon = 1e-12);
    assert_relative_eq!(slice.profile_conditions.t_e[0], 6.1625, epsilon = 1e-12);

    let slice = provider.call(20.0).unwrap();
    assert_relative_eq!(slice.profile_conditions.t_e_right_bc, 0.4);
}

#[test]
fn stepped_boundary_holds_between_knots() {
    let provider = ramp_up();
    let n_e_right_bc = |t| provider.call(t).unwrap().profile_conditions.n_e_right_bc;

    assert_relative_eq!(n_e_right_bc(4.0), 0.6);
    assert_relative_eq!(n_e_right_bc(6.0), 0.6);
    assert_relative_eq!(n_e_right_bc(6.99), 0.6);
    assert_relative_eq!(n_e_right_bc(7.0), 0.8);
}

#[test]
fn explicit_fgw_flag_is_kept() {
    let config = load_with_grid(Format::Json, Format::Json.ramp_up(), 4).unwrap();
    let provider = DynamicRuntimeParamsSliceProvider::from_config(&config).unwrap();

    let slice = provider.call(0.0).unwrap();
    assert!(slice.profile_conditions.n_e_right_bc_is_fgw);
    assert!(slice.profile_conditions.n_e_nbar_is_fgw);

    let statics = build_static_params_from_config(&config).unwrap();
    assert!(statics.profile_conditions.n_e_right_bc_is_absolute);
    assert!(!statics.profile_conditions.t_e_right_bc_is_absolute);
}

#[test]
fn scalar_parameters_carry_units() {
    let slice = ramp_up().call(40.0).unwrap();

    assert_relative_eq!(slice.profile_conditions.ip.get::<megaampere>(), 6.75);

    let DynamicSourceParams::GenericHeat(heat) = &slice.sources["generic_heat"] else {
        panic!("expected generic_heat parameters");
    };
    assert_relative_eq!(heat.p_total.get::<watt>(), 2.0e7);
}

#[test]
fn pedestal_switches_off_at_its_knot() {
    let provider = ramp_up();

    assert!(provider.call(0.5).unwrap().pedestal.set_pedestal());
    assert!(!provider.call(1.0).unwrap().pedestal.set_pedestal());

    let DynamicPedestalParams::SetTpedNped { t_i_ped, .. } = provider.call(3.0).unwrap().pedestal
    else {
        panic!("expected set_T_ped_n_ped");
    };
    assert_relative_eq!(t_i_ped, 4.5);
}

#[test]
fn sources_are_resolved_by_name() {
    let slice = ramp_up().call(5.0).unwrap();

    assert_eq!(slice.sources.len(), 2);
    let DynamicSourceParams::GenericCurrent(current) = &slice.sources["generic_current"] else {
        panic!("expected generic_current parameters");
    };
    assert_relative_eq!(current.gaussian_width, 0.15, epsilon = 1e-12);
}

#[test]
fn slices_serialize_with_configuration_names() {
    let slice = ramp_up().call(1.0).unwrap();
    let value = serde_json::to_value(&slice).unwrap();

    assert_eq!(value["t"], 1.0);
    assert_eq!(value["profile_conditions"]["T_i_right_bc"], 2.5);
    assert_eq!(value["profile_conditions"]["T_i"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["pedestal"]["pedestal_model"], "set_T_ped_n_ped");
    assert!(value["sources"]["generic_heat"].get("P_total").is_some());
}
