//! Risk engine tests: ratio, liquidation price, safety table, suggestions,
//! health score.

use vault_core::risk::{Position, RiskEngine, SafetyLevel, compute_ratio};

const EPS: f64 = 1e-9;

fn engine() -> RiskEngine {
    RiskEngine::default()
}

// --- Ratio ---------------------------------------------------------------

#[test]
fn test_ratio_increases_with_collateral_and_price() {
    let mut last = 0.0;
    for collateral in [10.0, 100.0, 250.0, 1000.0, 5000.0] {
        let ratio = compute_ratio(&Position::new(collateral, 200.0, 0.85));
        assert!(ratio > last, "ratio must grow with collateral: {ratio} <= {last}");
        last = ratio;
    }

    let mut last = 0.0;
    for price in [0.1, 0.5, 0.85, 1.2, 3.0] {
        let ratio = compute_ratio(&Position::new(1000.0, 200.0, price));
        assert!(ratio > last, "ratio must grow with price: {ratio} <= {last}");
        last = ratio;
    }
}

#[test]
fn test_ratio_decreases_with_borrow() {
    let mut last = f64::INFINITY;
    for borrow in [1.0, 50.0, 200.0, 800.0, 5000.0] {
        let ratio = compute_ratio(&Position::new(1000.0, borrow, 0.85));
        assert!(ratio < last, "ratio must shrink with borrow: {ratio} >= {last}");
        last = ratio;
    }
}

#[test]
fn test_zero_borrow_is_zero_ratio_and_unknown() {
    for (collateral, price) in [(0.0, 0.0), (1000.0, 0.85), (1.0, 1000.0)] {
        let p = Position::new(collateral, 0.0, price);
        assert_eq!(compute_ratio(&p), 0.0);
        assert_eq!(engine().classify_position(&p), SafetyLevel::Unknown);
        assert_eq!(engine().assess(&p).safety_level, SafetyLevel::Unknown);
    }
    assert_eq!(engine().classify_safety(0.0), SafetyLevel::Unknown);
}

// --- Safety table --------------------------------------------------------

#[test]
fn test_classify_safety_boundaries_are_exact() {
    let e = engine();
    assert_eq!(e.classify_safety(300.0), SafetyLevel::VerySafe);
    assert_eq!(e.classify_safety(299.999), SafetyLevel::Safe);
    assert_eq!(e.classify_safety(200.0), SafetyLevel::Safe);
    assert_eq!(e.classify_safety(199.999), SafetyLevel::Risky);
    assert_eq!(e.classify_safety(170.0), SafetyLevel::Risky);
    assert_eq!(e.classify_safety(169.999), SafetyLevel::Danger);
    assert_eq!(e.classify_safety(1.0), SafetyLevel::Danger);
}

#[test]
fn test_classify_safety_never_panics_on_non_finite() {
    let e = engine();
    assert_eq!(e.classify_safety(f64::NAN), SafetyLevel::Unknown);
    assert_eq!(e.classify_safety(f64::INFINITY), SafetyLevel::Unknown);
    assert_eq!(e.classify_safety(-10.0), SafetyLevel::Unknown);
}

// --- Scenarios -------------------------------------------------------------

#[test]
fn test_scenario_1000_collateral_200_borrow_is_very_safe() {
    let p = Position::new(1000.0, 200.0, 0.85);
    let a = engine().assess(&p);
    assert!((a.collateral_value - 850.0).abs() < EPS);
    assert!((a.collateralization_ratio_pct - 425.0).abs() < EPS);
    assert_eq!(a.safety_level, SafetyLevel::VerySafe);
    assert!((a.liquidation_price - 0.30).abs() < EPS);
    // (0.85 - 0.30) / 0.85 * 100
    assert!((a.liquidation_buffer_pct - 64.70588235294117).abs() < 1e-6);
}

#[test]
fn test_scenario_170_percent_is_risky_inclusive() {
    let p = Position::new(100.0, 50.0, 0.85);
    let a = engine().assess(&p);
    assert!((a.collateralization_ratio_pct - 170.0).abs() < EPS);
    assert_eq!(a.safety_level, SafetyLevel::Risky);
}

#[test]
fn test_scenario_borrow_suggestions() {
    let e = engine();
    assert!((e.recommended_borrow(1000.0, 0.85) - 212.5).abs() < EPS);
    assert!((e.max_safe_borrow(1000.0, 0.85) - 283.333_333_333).abs() < 1e-6);

    // Borrowing the suggestion lands on the targeted ratio.
    let rec = Position::new(1000.0, e.recommended_borrow(1000.0, 0.85), 0.85);
    assert!((compute_ratio(&rec) - 400.0).abs() < 1e-6);
    let max = Position::new(1000.0, e.max_safe_borrow(1000.0, 0.85), 0.85);
    assert!((compute_ratio(&max) - 300.0).abs() < 1e-6);
}

#[test]
fn test_suggestions_zero_for_invalid_inputs() {
    let e = engine();
    assert_eq!(e.recommended_borrow(0.0, 0.85), 0.0);
    assert_eq!(e.max_safe_borrow(-5.0, 0.85), 0.0);
    assert_eq!(e.max_safe_borrow(1000.0, f64::NAN), 0.0);
}

// --- Health score ----------------------------------------------------------

#[test]
fn test_health_score_endpoints_and_clamping() {
    let e = engine();
    assert_eq!(e.health_score(150.0), 0.0);
    assert_eq!(e.health_score(300.0), 100.0);
    assert_eq!(e.health_score(75.0), 0.0);
    assert_eq!(e.health_score(450.0), 100.0);
    assert!((e.health_score(225.0) - 50.0).abs() < EPS);
    assert_eq!(e.health_score(f64::NAN), 0.0);
}

#[test]
fn test_outputs_never_non_finite() {
    let e = engine();
    let cases = [
        Position::new(0.0, 0.0, 0.0),
        Position::new(f64::MAX, 1e-300, f64::MAX),
        Position::new(1e-300, f64::MAX, 1e-300),
        Position::new(f64::NAN, f64::INFINITY, -1.0),
    ];
    for p in cases {
        let a = e.assess(&p);
        assert!(a.collateralization_ratio_pct.is_finite(), "{p:?}");
        assert!(a.liquidation_price.is_finite(), "{p:?}");
        assert!(a.collateral_value.is_finite(), "{p:?}");
        assert!(a.liquidation_buffer_pct.is_finite(), "{p:?}");
        assert!(e.health_score(a.collateralization_ratio_pct).is_finite());
    }
}

#[test]
fn test_overflowing_positions_keep_their_true_class() {
    let e = engine();

    let overcollateralized = Position::from_inputs("1e200", "1e-200", 0.85);
    let a = e.assess(&overcollateralized);
    assert_eq!(a.collateralization_ratio_pct, f64::MAX);
    assert_eq!(a.safety_level, SafetyLevel::VerySafe);
    assert_eq!(e.health_score(a.collateralization_ratio_pct), 100.0);
    assert!(!e.is_warning(a.collateralization_ratio_pct));

    let undercollateralized = Position::from_inputs("1e-300", "1e300", 0.85);
    let a = e.assess(&undercollateralized);
    assert_eq!(a.liquidation_price, f64::MAX);
    assert!(a.liquidation_buffer_pct < 0.0);
    assert!(a.liquidation_buffer_pct.is_finite());
    assert_eq!(a.safety_level, SafetyLevel::Danger);
}
