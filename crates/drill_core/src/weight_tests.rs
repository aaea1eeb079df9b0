use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_fresh_variant() {
    let f = compute_factors(&VariantStats::default(), 0, &WeightSettings::default());
    assert!(close(f.recency, 1.0));
    assert!(close(f.frequency, 1.0));
    assert!(close(f.error, 1.0));
    assert!(close(f.newness, 64.0));
    assert!(close(f.weight, 64.0));
}

#[test]
fn test_factor_formulas() {
    let stats = VariantStats {
        times_played: 3,
        last_succeeded_epoch: 4,
        error_ema: 1.5,
        success_ema: 0.5,
    };
    let f = compute_factors(&stats, 10, &WeightSettings::default());
    assert!(close(f.recency, 7.0));
    assert!(close(f.frequency, 1.0 / 2.25));
    assert!(close(f.error, 6.25));
    assert!(close(f.newness, 25.0));
    assert!(close(f.weight, 7.0 / 2.25 * 6.25 * 25.0));
}

#[test]
fn test_newness_fades_after_threshold() {
    let stats = VariantStats {
        times_played: 12,
        ..Default::default()
    };
    let f = compute_factors(&stats, 0, &WeightSettings::default());
    assert!(close(f.newness, 1.0));
}

#[test]
fn test_future_success_epoch_saturates() {
    let stats = VariantStats {
        last_succeeded_epoch: 9,
        ..Default::default()
    };
    let f = compute_factors(&stats, 3, &WeightSettings::default());
    assert!(close(f.recency, 1.0));
}

#[test]
fn test_custom_powers_are_applied() {
    let stats = VariantStats {
        times_played: 7,
        last_succeeded_epoch: 0,
        error_ema: 1.0,
        success_ema: 1.0,
    };
    let settings = WeightSettings {
        recency_power: 2.0,
        frequency_power: 1.0,
        error_power: 3.0,
        newness_power: 0.0,
    };
    let f = compute_factors(&stats, 2, &settings);
    assert!(close(f.recency, 9.0));
    assert!(close(f.frequency, 0.5));
    assert!(close(f.error, 8.0));
    assert!(close(f.newness, 1.0));
}

#[test]
fn test_sanitized_replaces_bad_powers() {
    let settings = WeightSettings {
        recency_power: -1.0,
        frequency_power: f64::NAN,
        error_power: 3.0,
        newness_power: f64::INFINITY,
    }
    .sanitized();
    assert_eq!(settings.recency_power, WeightSettings::DEFAULT_RECENCY_POWER);
    assert_eq!(settings.frequency_power, WeightSettings::DEFAULT_FREQUENCY_POWER);
    assert_eq!(settings.error_power, 3.0);
    assert_eq!(settings.newness_power, WeightSettings::DEFAULT_NEWNESS_POWER);
}

#[test]
fn test_settings_json_defaults() {
    let settings: WeightSettings = serde_json::from_str(r#"{"errorPower": 3}"#).unwrap();
    assert_eq!(settings.error_power, 3.0);
    assert_eq!(settings.recency_power, 1.0);
    assert_eq!(settings.newness_power, 2.0);
}

#[test]
fn test_settings_json_null_powers() {
    let settings: WeightSettings =
        serde_json::from_str(r#"{"recencyPower": null, "errorPower": 3, "newnessPower": null}"#)
            .unwrap();
    assert_eq!(settings.recency_power, WeightSettings::DEFAULT_RECENCY_POWER);
    assert_eq!(settings.error_power, 3.0);
    assert_eq!(settings.newness_power, WeightSettings::DEFAULT_NEWNESS_POWER);
}

#[test]
fn test_log_weight_matches_weight() {
    let stats = VariantStats {
        times_played: 3,
        last_succeeded_epoch: 4,
        error_ema: 1.5,
        success_ema: 0.5,
    };
    let settings = WeightSettings::default();
    let f = compute_factors(&stats, 10, &settings);
    assert!(close(log_weight(&stats, 10, &settings), f.weight.ln()));
}

#[test]
fn test_log_weight_finite_past_overflow() {
    let stats = VariantStats {
        error_ema: 10.0,
        ..Default::default()
    };
    let settings = WeightSettings {
        error_power: 400.0,
        ..Default::default()
    };
    assert!(compute_factors(&stats, 0, &settings).weight.is_infinite());
    assert!(log_weight(&stats, 0, &settings).is_finite());
}
