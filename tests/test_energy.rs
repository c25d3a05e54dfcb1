#[macro_use]
mod common;

use proptest::prelude::*;

use pv_shading::energy::*;
use pv_shading::error::ShadingError;
use pv_shading::types::*;

fn reference_array() -> ArraySpec {
    ArraySpec::new(20, Weather::Clear).unwrap()
}

fn obstacle(height: f64, distance: f64) -> Obstacle {
    Obstacle::new(ObstacleKind::Tree, height, distance).unwrap()
}

// ── Theoretical yield ──

#[test]
fn test_reference_array_without_obstacles() {
    let result = estimate(&reference_array(), &[]).unwrap();
    assert_approx!(result.peak_power_kw, 8.0, 1e-12);
    assert_approx!(result.theoretical_kwh, 12403.2, 1e-6);
    assert_eq!(result.loss_pct, 0.0);
    assert_eq!(result.shaded_kwh, result.theoretical_kwh);
    assert!(result.obstacle_losses.is_empty());
}

#[test]
fn test_reference_array_consumption_split() {
    let result = estimate(&reference_array(), &[]).unwrap();
    assert_approx!(result.self_consumed_kwh, 7434.0, 1e-6);
    assert_approx!(result.injected_kwh, 4969.2, 1e-6);
    assert_approx!(result.grid_import_kwh, 826.0, 1e-6);
}

#[test]
fn test_weather_factor_scales_yield() {
    let cloudy = ArraySpec::new(20, Weather::Cloudy).unwrap();
    let rainy = ArraySpec::new(20, Weather::Rainy).unwrap();
    assert_approx!(theoretical_yield(&cloudy), 9302.4, 1e-6);
    assert_approx!(theoretical_yield(&rainy), 12403.2 * 0.55, 1e-6);
}

#[test]
fn test_small_array_below_consumption() {
    let array = ArraySpec::new(5, Weather::Clear).unwrap();
    let result = estimate(&array, &[]).unwrap();
    assert_approx!(result.theoretical_kwh, 3100.8, 1e-6);
    assert_approx!(result.self_consumed_kwh, 2790.72, 1e-6);
    assert_approx!(result.injected_kwh, 310.08, 1e-6);
    assert_approx!(result.grid_import_kwh, 5469.28, 1e-6);
}

#[test]
fn test_custom_consumption_profile() {
    let profile = ConsumptionProfile {
        annual_consumption_kwh: 4000.0,
        self_consumption_efficiency: 1.0,
    };
    let result = estimate_with(&reference_array(), &[], &profile).unwrap();
    assert_approx!(result.self_consumed_kwh, 4000.0, 1e-9);
    assert_approx!(result.grid_import_kwh, 0.0, 1e-9);
    assert_approx!(result.injected_kwh, 8403.2, 1e-6);
}

// ── Per-obstacle loss ──

#[test]
fn test_single_obstacle_half_slope() {
    let result = estimate(&reference_array(), &[obstacle(5.0, 10.0)]).unwrap();
    let loss = result.obstacle_losses[0];
    assert_approx!(loss.angle_deg, 26.565, 1e-3);
    assert_approx!(loss.loss_pct, 7.379, 1e-3);
    assert_approx!(result.loss_pct, 7.379, 1e-3);
    assert_approx!(
        result.shaded_kwh,
        result.theoretical_kwh * (1.0 - result.loss_pct / 100.0),
        1e-9
    );
}

#[test]
fn test_threshold_is_inclusive() {
    assert_eq!(obstacle_loss(0.0), 0.0);
    assert_eq!(obstacle_loss(WINTER_SUN_THRESHOLD_DEG), 0.0);
    assert!(obstacle_loss(WINTER_SUN_THRESHOLD_DEG + 1e-6) > 0.0);
    assert_approx!(obstacle_loss(6.0001), 6.0001 / 90.0 * 25.0, 1e-12);
}

#[test]
fn test_low_obstacle_casts_no_loss() {
    // atan(1 / 10) is about 5.71°
    let result = estimate(&reference_array(), &[obstacle(1.0, 10.0)]).unwrap();
    assert!(result.obstacle_losses[0].angle_deg < WINTER_SUN_THRESHOLD_DEG);
    assert_eq!(result.loss_pct, 0.0);
}

#[test]
fn test_near_vertical_obstacle_stays_under_cap() {
    let result = estimate(&reference_array(), &[obstacle(20.0, 1e-6)]).unwrap();
    let loss = result.obstacle_losses[0].loss_pct;
    assert!(loss <= PER_OBSTACLE_LOSS_CAP_PCT);
    assert!(loss > 24.99, "loss={}", loss);
    assert_eq!(obstacle_loss(90.0), PER_OBSTACLE_LOSS_CAP_PCT);
    assert_eq!(obstacle_loss(120.0), PER_OBSTACLE_LOSS_CAP_PCT);
}

#[test]
fn test_total_loss_capped() {
    let obstacles = [obstacle(20.0, 0.01), obstacle(20.0, 0.01), obstacle(20.0, 0.01)];
    let result = estimate(&reference_array(), &obstacles).unwrap();
    let raw: f64 = result.obstacle_losses.iter().map(|l| l.loss_pct).sum();
    assert!(raw > TOTAL_LOSS_CAP_PCT);
    assert_eq!(result.loss_pct, TOTAL_LOSS_CAP_PCT);
    assert_approx!(result.shaded_kwh, result.theoretical_kwh * 0.4, 1e-6);
}

#[test]
fn test_contributions_keep_input_order() {
    let obstacles = [obstacle(6.0, 10.0), obstacle(1.0, 10.0), obstacle(5.0, 10.0)];
    let result = estimate(&reference_array(), &obstacles).unwrap();
    let losses: Vec<f64> = result.obstacle_losses.iter().map(|l| l.loss_pct).collect();
    assert_approx!(losses[0], 8.601, 1e-3);
    assert_eq!(losses[1], 0.0);
    assert_approx!(losses[2], 7.379, 1e-3);
    assert_approx!(result.loss_pct, 15.980, 1e-3);
}

#[test]
fn test_obstacle_kind_does_not_change_loss() {
    let kinds = [
        ObstacleKind::Tree,
        ObstacleKind::Building,
        ObstacleKind::Wall,
        ObstacleKind::Hill,
    ];
    let losses: Vec<f64> = kinds
        .iter()
        .map(|&k| {
            let o = Obstacle::new(k, 8.0, 12.0).unwrap();
            estimate(&reference_array(), &[o]).unwrap().loss_pct
        })
        .collect();
    assert!(losses.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_bearing_does_not_change_loss() {
    let plain = obstacle(8.0, 12.0);
    let turned = plain.with_bearing(-75.0).unwrap();
    let a = estimate(&reference_array(), &[plain]).unwrap();
    let b = estimate(&reference_array(), &[turned]).unwrap();
    assert_eq!(a.loss_pct, b.loss_pct);
}

#[test]
fn test_aggregate_loss_fold() {
    assert_eq!(aggregate_loss(Vec::<f64>::new()), 0.0);
    assert_approx!(aggregate_loss([10.0, 12.5]), 22.5, 1e-12);
    assert_eq!(aggregate_loss([25.0, 25.0, 25.0]), TOTAL_LOSS_CAP_PCT);
}

// ── Validation ──

#[test]
fn test_zero_distance_rejected() {
    let err = Obstacle::new(ObstacleKind::Wall, 3.0, 0.0).unwrap_err();
    assert!(matches!(err, ShadingError::InvalidGeometry { .. }));
}

#[test]
fn test_non_positive_height_rejected() {
    for h in [0.0, -2.0, f64::NAN, f64::INFINITY] {
        let err = Obstacle::new(ObstacleKind::Tree, h, 10.0).unwrap_err();
        assert!(matches!(err, ShadingError::InvalidGeometry { .. }), "h={}", h);
    }
}

#[test]
fn test_bearing_out_of_range_rejected() {
    let err = obstacle(5.0, 10.0).with_bearing(120.0).unwrap_err();
    assert!(matches!(err, ShadingError::InvalidGeometry { .. }));
    assert!(obstacle(5.0, 10.0).with_bearing(90.0).is_ok());
}

#[test]
fn test_panel_count_bounds() {
    for count in [0, MAX_PANELS + 1] {
        let err = ArraySpec::new(count, Weather::Clear).unwrap_err();
        assert!(matches!(
            err,
            ShadingError::InvalidParameter { name: "panel_count", .. }
        ));
    }
    assert!(ArraySpec::new(1, Weather::Clear).is_ok());
    assert!(ArraySpec::new(MAX_PANELS, Weather::Clear).is_ok());
}

#[test]
fn test_weather_keys() {
    assert_eq!("clear".parse::<Weather>().unwrap(), Weather::Clear);
    assert_eq!("Cloudy".parse::<Weather>().unwrap(), Weather::Cloudy);
    assert_eq!(" rainy ".parse::<Weather>().unwrap(), Weather::Rainy);
    let err = "foggy".parse::<Weather>().unwrap_err();
    assert!(matches!(err, ShadingError::InvalidParameter { name: "weather", .. }));
}

#[test]
fn test_estimate_revalidates_public_fields() {
    let mut array = reference_array();
    array.panel_count = 0;
    assert!(estimate(&array, &[]).is_err());

    let mut array = reference_array();
    array.derate = 1.2;
    assert!(estimate(&array, &[]).is_err());

    let mut o = obstacle(5.0, 10.0);
    o.distance_m = -1.0;
    let err = estimate(&reference_array(), &[o]).unwrap_err();
    assert!(matches!(err, ShadingError::InvalidGeometry { .. }));
}

#[test]
fn test_unbounded_site_scalars_rejected() {
    let mut array = reference_array();
    array.panel_power_kw = f64::MAX;
    let err = estimate(&array, &[]).unwrap_err();
    assert!(matches!(err, ShadingError::InvalidParameter { name: "panel_power_kw", .. }));

    let mut array = reference_array();
    array.irradiation_kwh_m2 = 1e308;
    let err = estimate(&array, &[]).unwrap_err();
    assert!(matches!(err, ShadingError::InvalidParameter { name: "irradiation_kwh_m2", .. }));

    let profile = ConsumptionProfile {
        annual_consumption_kwh: f64::MAX,
        ..ConsumptionProfile::default()
    };
    assert!(estimate_with(&reference_array(), &[], &profile).is_err());
}

#[test]
fn test_largest_accepted_inputs_stay_finite() {
    let array = ArraySpec {
        panel_count: MAX_PANELS,
        panel_power_kw: MAX_PANEL_POWER_KW,
        irradiation_kwh_m2: MAX_IRRADIATION_KWH_M2,
        derate: 1.0,
        ..ArraySpec::default()
    };
    let profile = ConsumptionProfile {
        annual_consumption_kwh: MAX_ANNUAL_CONSUMPTION_KWH,
        self_consumption_efficiency: 1.0,
    };
    let hill = Obstacle::new(ObstacleKind::Hill, MAX_OBSTACLE_HEIGHT_M, 1e-300).unwrap();
    let result = estimate_with(&array, &[hill; MAX_OBSTACLES], &profile).unwrap();
    for value in [
        result.peak_power_kw,
        result.theoretical_kwh,
        result.loss_pct,
        result.shaded_kwh,
        result.self_consumed_kwh,
        result.injected_kwh,
        result.grid_import_kwh,
    ] {
        assert!(value.is_finite(), "{:?}", result);
    }
    assert!(result.obstacle_losses.iter().all(|l| l.angle_deg.is_finite()));
}

#[test]
fn test_too_many_obstacles_rejected() {
    let obstacles = [obstacle(5.0, 10.0); MAX_OBSTACLES + 1];
    let err = estimate(&reference_array(), &obstacles).unwrap_err();
    assert!(matches!(err, ShadingError::InvalidParameter { name: "obstacles", .. }));
}

#[test]
fn test_invalid_efficiency_rejected() {
    let profile = ConsumptionProfile {
        self_consumption_efficiency: 1.5,
        ..ConsumptionProfile::default()
    };
    assert!(estimate_with(&reference_array(), &[], &profile).is_err());
}

// ── Properties ──

fn arb_obstacle() -> impl Strategy<Value = Obstacle> {
    (0.1..50.0f64, 0.01..100.0f64)
        .prop_map(|(h, d)| Obstacle::new(ObstacleKind::Building, h, d).unwrap())
}

fn arb_array() -> impl Strategy<Value = ArraySpec> {
    (
        1..=MAX_PANELS,
        prop_oneof![Just(Weather::Clear), Just(Weather::Cloudy), Just(Weather::Rainy)],
    )
        .prop_map(|(n, w)| ArraySpec::new(n, w).unwrap())
}

proptest! {
    #[test]
    fn prop_no_obstacles_no_loss(array in arb_array()) {
        let result = estimate(&array, &[]).unwrap();
        prop_assert_eq!(result.loss_pct, 0.0);
        prop_assert_eq!(result.shaded_kwh, result.theoretical_kwh);
    }

    #[test]
    fn prop_loss_bounded(
        array in arb_array(),
        obstacles in prop::collection::vec(arb_obstacle(), 0..=MAX_OBSTACLES),
    ) {
        let result = estimate(&array, &obstacles).unwrap();
        prop_assert!(result.loss_pct >= 0.0);
        prop_assert!(result.loss_pct <= TOTAL_LOSS_CAP_PCT);
        for l in &result.obstacle_losses {
            prop_assert!(l.loss_pct >= 0.0 && l.loss_pct <= PER_OBSTACLE_LOSS_CAP_PCT);
        }
    }

    #[test]
    fn prop_split_non_negative(
        array in arb_array(),
        obstacles in prop::collection::vec(arb_obstacle(), 0..=MAX_OBSTACLES),
    ) {
        let result = estimate(&array, &obstacles).unwrap();
        let demand = ConsumptionProfile::default().annual_consumption_kwh;
        prop_assert!(result.self_consumed_kwh <= demand.min(result.shaded_kwh));
        prop_assert!(result.injected_kwh >= 0.0);
        prop_assert!(result.grid_import_kwh >= 0.0);
        prop_assert!(result.shaded_kwh <= result.theoretical_kwh);
    }
}
