use approx::assert_relative_eq;
use integration_tests::{Format, load_with_grid};
use rampup_core::{Component, constraint::ConstraintError};
use rampup_params::{DynamicRuntimeParamsSliceProvider, ParamsError, build_static_params_from_config};

const NARROWING_CURRENT: &str = "
sources:
  generic_current:
    gaussian_width: {0: 1.0, 1: -1.0}
";

#[test]
fn configuration_with_a_late_violation_still_builds() {
    let config = load_with_grid(Format::Yaml, NARROWING_CURRENT, 4).unwrap();

    assert!(build_static_params_from_config(&config).is_ok());
    assert!(DynamicRuntimeParamsSliceProvider::from_config(&config).is_ok());
}

#[test]
fn violation_is_reported_only_when_queried() {
    let config = load_with_grid(Format::Yaml, NARROWING_CURRENT, 4).unwrap();
    let provider = DynamicRuntimeParamsSliceProvider::from_config(&config).unwrap();

    assert!(provider.call(0.0).is_ok());
    assert!(provider.call(0.5).is_ok());

    let err = provider.call(1.0).unwrap_err();
    let ParamsError::Validation(validation) = &err else {
        panic!("expected a validation error, got {err}");
    };
    assert_eq!(validation.section, "generic_current");
    assert_eq!(validation.field, "gaussian_width");
    assert_relative_eq!(validation.value, -1.0);
    assert_relative_eq!(validation.time, 1.0);
    assert_eq!(validation.reason, ConstraintError::Negative);

    let message = err.to_string();
    assert!(message.contains("gaussian_width"), "{message}");
}

#[test]
fn provider_recovers_after_a_failed_query() {
    let config = load_with_grid(Format::Yaml, NARROWING_CURRENT, 4).unwrap();
    let provider = DynamicRuntimeParamsSliceProvider::from_config(&config).unwrap();

    let before = provider.call(0.25).unwrap();
    assert!(provider.call(2.0).is_err());
    assert_eq!(provider.call(0.25).unwrap(), before);
}

#[test]
fn pedestal_top_location_is_unchecked() {
    let config = load_with_grid(
        Format::Yaml,
        "
pedestal:
  pedestal_model: set_T_ped_n_ped
  rho_norm_ped_top: {0: 3.0, 1: 5.0}
",
        4,
    )
    .unwrap();
    let provider = DynamicRuntimeParamsSliceProvider::from_config(&config).unwrap();

    assert!(provider.call(0.0).is_ok());
    assert!(provider.call(1.0).is_ok());
}
