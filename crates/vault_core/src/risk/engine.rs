//! Collateralization risk engine.
//!
//! Every operation is a total function of a `Position` snapshot:
//! - ratio = `collateral * price / borrow * 100`, `0` without debt.
//! - liquidation price = price at which collateral covers
//!   `liquidation_threshold_pct` of the debt, `0` without collateral.
//! - no NaN or Infinity ever leaves this module; overflow saturates at
//!   `f64::MAX` so an extreme position keeps its true class.
//!
//! Nothing is cached; callers re-derive on every input change.

use super::position::Position;
use super::safety::SafetyLevel;

/// Thresholds the engine classifies and scores against.
///
/// Defaults encode a 150% liquidation threshold and the 300/200/170 safety
/// table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskParams {
    pub liquidation_threshold_pct: f64,
    pub very_safe_ratio_pct: f64,
    pub safe_ratio_pct: f64,
    pub risky_ratio_pct: f64,
    /// Ratio targeted by the "recommended" borrow suggestion (400% = value / 4).
    pub recommended_target_ratio_pct: f64,
    /// Ratio targeted by the "max safe" borrow suggestion (300% = value / 3).
    pub max_safe_target_ratio_pct: f64,
    /// Ratio mapped to health score 0.
    pub health_floor_ratio_pct: f64,
    /// Ratio mapped to health score 100.
    pub health_ceiling_ratio_pct: f64,
    /// Dashboard shows a warning below this ratio.
    pub warning_ratio_pct: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            liquidation_threshold_pct: 150.0,
            very_safe_ratio_pct: 300.0,
            safe_ratio_pct: 200.0,
            risky_ratio_pct: 170.0,
            recommended_target_ratio_pct: 400.0,
            max_safe_target_ratio_pct: 300.0,
            health_floor_ratio_pct: 150.0,
            health_ceiling_ratio_pct: 300.0,
            warning_ratio_pct: 200.0,
        }
    }
}

impl RiskParams {
    /// Whether the thresholds are finite, positive and correctly ordered.
    pub fn is_valid(&self) -> bool {
        let all = [
            self.liquidation_threshold_pct,
            self.very_safe_ratio_pct,
            self.safe_ratio_pct,
            self.risky_ratio_pct,
            self.recommended_target_ratio_pct,
            self.max_safe_target_ratio_pct,
            self.health_floor_ratio_pct,
            self.health_ceiling_ratio_pct,
            self.warning_ratio_pct,
        ];
        if all.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return false;
        }
        self.risky_ratio_pct <= self.safe_ratio_pct
            && self.safe_ratio_pct <= self.very_safe_ratio_pct
            && self.health_floor_ratio_pct < self.health_ceiling_ratio_pct
    }
}

/// Derived risk figures for one position. Never stored apart from the
/// position it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub collateralization_ratio_pct: f64,
    pub liquidation_price: f64,
    pub safety_level: SafetyLevel,
    /// Collateral valued at the current price.
    pub collateral_value: f64,
    /// How far (in %) the price may fall before reaching the liquidation price.
    pub liquidation_buffer_pct: f64,
}

impl RiskAssessment {
    pub fn empty() -> Self {
        Self {
            collateralization_ratio_pct: 0.0,
            liquidation_price: 0.0,
            safety_level: SafetyLevel::Unknown,
            collateral_value: 0.0,
            liquidation_buffer_pct: 0.0,
        }
    }
}

/// Borrow amounts suggested on the Amount step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorrowSuggestions {
    pub recommended: f64,
    pub max_safe: f64,
}

/// Collateral value at the position's price.
pub fn collateral_value(position: &Position) -> f64 {
    position.collateral_amount() * position.asset_price()
}

/// `(collateral * price / borrow) * 100`, or `0` without debt.
pub fn compute_ratio(position: &Position) -> f64 {
    if !position.has_debt() {
        return 0.0;
    }
    saturate((collateral_value(position) / position.borrow_amount()) * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiskEngine {
    params: RiskParams,
}

impl RiskEngine {
    pub fn new(params: RiskParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RiskParams {
        &self.params
    }

    pub fn compute_ratio(&self, position: &Position) -> f64 {
        compute_ratio(position)
    }

    /// `(borrow * threshold) / collateral`, or `0` without collateral.
    pub fn compute_liquidation_price(&self, position: &Position) -> f64 {
        if position.collateral_amount() <= 0.0 {
            return 0.0;
        }
        let threshold = self.params.liquidation_threshold_pct / 100.0;
        saturate((position.borrow_amount() * threshold) / position.collateral_amount())
    }

    /// Bucket a ratio, first match wins from the top of the table.
    ///
    /// A ratio of `0` (or anything non-finite) is the "undefined" sentinel
    /// and classifies as `Unknown`.
    pub fn classify_safety(&self, ratio_pct: f64) -> SafetyLevel {
        if !ratio_pct.is_finite() || ratio_pct <= 0.0 {
            return SafetyLevel::Unknown;
        }
        if ratio_pct >= self.params.very_safe_ratio_pct {
            SafetyLevel::VerySafe
        } else if ratio_pct >= self.params.safe_ratio_pct {
            SafetyLevel::Safe
        } else if ratio_pct >= self.params.risky_ratio_pct {
            SafetyLevel::Risky
        } else {
            SafetyLevel::Danger
        }
    }

    /// Safety of a whole position. Without debt it is `Unknown`; debt backed
    /// by zero collateral value is `Danger`.
    pub fn classify_position(&self, position: &Position) -> SafetyLevel {
        if !position.has_debt() {
            return SafetyLevel::Unknown;
        }
        match self.classify_safety(compute_ratio(position)) {
            SafetyLevel::Unknown => SafetyLevel::Danger,
            level => level,
        }
    }

    /// `collateral * price / 4` with default params (targets a 400% ratio).
    pub fn recommended_borrow(&self, collateral_amount: f64, asset_price: f64) -> f64 {
        borrow_for_target(
            collateral_amount,
            asset_price,
            self.params.recommended_target_ratio_pct,
        )
    }

    /// `collateral * price / 3` with default params (targets a 300% ratio).
    pub fn max_safe_borrow(&self, collateral_amount: f64, asset_price: f64) -> f64 {
        borrow_for_target(
            collateral_amount,
            asset_price,
            self.params.max_safe_target_ratio_pct,
        )
    }

    pub fn suggestions(&self, collateral_amount: f64, asset_price: f64) -> BorrowSuggestions {
        BorrowSuggestions {
            recommended: self.recommended_borrow(collateral_amount, asset_price),
            max_safe: self.max_safe_borrow(collateral_amount, asset_price),
        }
    }

    /// Linear map of the ratio onto 0..=100: floor ratio -> 0, ceiling -> 100.
    pub fn health_score(&self, ratio_pct: f64) -> f64 {
        if !ratio_pct.is_finite() {
            return 0.0;
        }
        let span = (self.params.health_ceiling_ratio_pct - self.params.health_floor_ratio_pct)
            / 100.0;
        if span <= 0.0 {
            return 0.0;
        }
        ((ratio_pct - self.params.health_floor_ratio_pct) / span).clamp(0.0, 100.0)
    }

    pub fn is_warning(&self, ratio_pct: f64) -> bool {
        ratio_pct < self.params.warning_ratio_pct
    }

    /// Full assessment of a position, recomputed from scratch.
    pub fn assess(&self, position: &Position) -> RiskAssessment {
        let ratio = compute_ratio(position);
        let liquidation_price = self.compute_liquidation_price(position);
        let price = position.asset_price();
        let liquidation_buffer_pct = if price > 0.0 {
            saturate((price - liquidation_price) / price * 100.0)
        } else {
            0.0
        };
        RiskAssessment {
            collateralization_ratio_pct: ratio,
            liquidation_price,
            safety_level: self.classify_position(position),
            collateral_value: saturate(collateral_value(position)),
            liquidation_buffer_pct,
        }
    }
}

fn borrow_for_target(collateral_amount: f64, asset_price: f64, target_ratio_pct: f64) -> f64 {
    let position = Position::new(collateral_amount, 0.0, asset_price);
    let divisor = target_ratio_pct / 100.0;
    if divisor <= 0.0 {
        return 0.0;
    }
    saturate(collateral_value(&position) / divisor)
}

/// Overflow clamps to the largest finite value of the same sign; NaN is `0`.
fn saturate(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(f64::MIN, f64::MAX)
    }
}
