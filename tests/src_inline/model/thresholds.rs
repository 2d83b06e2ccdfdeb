use super::*;

#[test]
fn test_default_sweep_has_fifty_steps() {
    let t = EvalProfile::default_v1().thresholds();
    assert_eq!(t.len(), 50);
    assert!((t[0] - 0.50).abs() < 1e-12);
    assert!((t[49] - 0.99).abs() < 1e-9);
    assert!(t.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_custom_sweep() {
    let profile = EvalProfile {
        sweep_start: 0.0,
        sweep_stop: 1.0,
        sweep_step: 0.25,
        ..EvalProfile::default()
    };
    assert_eq!(profile.thresholds(), vec![0.0, 0.25, 0.5, 0.75]);
}

#[test]
fn test_validate_rejects_bad_profiles() {
    let base = EvalProfile::default_v1();
    let zero_step = EvalProfile {
        sweep_step: 0.0,
        ..base
    };
    assert_eq!(zero_step.validate(), Err(ProfileError::NonPositiveStep(0.0)));
    assert!(zero_step.thresholds().is_empty());

    let inverted = EvalProfile {
        sweep_start: 0.9,
        sweep_stop: 0.5,
        ..base
    };
    assert!(matches!(
        inverted.validate(),
        Err(ProfileError::EmptyRange { .. })
    ));

    let nan_cutoff = EvalProfile {
        overlap_cutoff: f64::NAN,
        ..base
    };
    assert!(matches!(
        nan_cutoff.validate(),
        Err(ProfileError::NonFinite { name: "overlap cutoff", .. })
    ));
    assert!(base.validate().is_ok());
}

#[test]
fn test_validate_rejects_oversized_sweep() {
    let tiny_step = EvalProfile {
        sweep_step: 1e-300,
        ..EvalProfile::default_v1()
    };
    assert!(matches!(
        tiny_step.validate(),
        Err(ProfileError::TooManySteps { .. })
    ));
    assert!(tiny_step.thresholds().is_empty());

    let fine_step = EvalProfile {
        sweep_start: 0.0,
        sweep_stop: 1.0,
        sweep_step: 1e-5,
        ..EvalProfile::default_v1()
    };
    assert!(fine_step.validate().is_ok());
    assert!(fine_step.thresholds().len() <= MAX_SWEEP_STEPS);
}
