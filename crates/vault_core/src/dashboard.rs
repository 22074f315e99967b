//! Post-wizard vault health derivation.
//!
//! Collateral and debt are fixed at wizard completion; only the price moves.
//! Each price change re-derives ratio, health score and warning state from
//! scratch through the risk engine.

use crate::risk::{HealthBand, Position, RiskEngine, SafetyLevel, collateral_value};

/// Health figures for one price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VaultHealth {
    pub asset_price: f64,
    pub ratio_pct: f64,
    pub health_score: f64,
    pub band: HealthBand,
    pub safety: SafetyLevel,
    pub collateral_value: f64,
    /// Ratio below the warning threshold while debt is outstanding.
    pub warning: bool,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    engine: RiskEngine,
    position: Position,
    health: VaultHealth,
    ticks_applied: u64,
}

impl DashboardState {
    pub fn new(engine: RiskEngine, position: Position) -> Self {
        let health = derive_health(&engine, &position);
        Self {
            engine,
            position,
            health,
            ticks_applied: 0,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn health(&self) -> &VaultHealth {
        &self.health
    }

    pub fn asset_price(&self) -> f64 {
        self.position.asset_price()
    }

    /// Number of price updates applied since entry.
    pub fn ticks_applied(&self) -> u64 {
        self.ticks_applied
    }

    /// Apply a new price and re-derive health. Returns the new figures.
    pub fn apply_price(&mut self, asset_price: f64) -> VaultHealth {
        let was_warning = self.health.warning;
        self.position = self.position.with_price(asset_price);
        self.health = derive_health(&self.engine, &self.position);
        self.ticks_applied += 1;

        tracing::debug!(
            "DashboardPriceTick price={:.4} ratio_pct={:.1} health={:.1}",
            self.health.asset_price,
            self.health.ratio_pct,
            self.health.health_score
        );
        if self.health.warning && !was_warning {
            tracing::warn!(
                "VaultEnteredWarningZone ratio_pct={:.1} warning_ratio_pct={}",
                self.health.ratio_pct,
                self.engine.params().warning_ratio_pct
            );
        }
        self.health
    }
}

/// `max(floor, price + delta)`.
pub fn perturb_price(asset_price: f64, delta: f64, floor: f64) -> f64 {
    let next = asset_price + delta;
    if next.is_finite() { next.max(floor) } else { floor }
}

fn derive_health(engine: &RiskEngine, position: &Position) -> VaultHealth {
    let ratio_pct = engine.compute_ratio(position);
    // No debt: nothing can be liquidated.
    let health_score = if position.has_debt() {
        engine.health_score(ratio_pct)
    } else {
        100.0
    };
    VaultHealth {
        asset_price: position.asset_price(),
        ratio_pct,
        health_score,
        band: HealthBand::from_score(health_score),
        safety: engine.classify_position(position),
        collateral_value: collateral_value(position),
        warning: position.has_debt() && engine.is_warning(ratio_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perturb_price_respects_floor() {
        assert_eq!(perturb_price(0.105, -0.01, 0.1), 0.1);
        assert!((perturb_price(0.85, 0.01, 0.1) - 0.86).abs() < 1e-12);
        assert_eq!(perturb_price(f64::NAN, 0.01, 0.1), 0.1);
    }

    #[test]
    fn zero_debt_is_fully_healthy_without_warning() {
        let state = DashboardState::new(RiskEngine::default(), Position::new(1000.0, 0.0, 0.85));
        assert_eq!(state.health().health_score, 100.0);
        assert!(!state.health().warning);
        assert_eq!(state.health().safety, SafetyLevel::Unknown);
    }

    #[test]
    fn entry_derives_health_before_any_tick() {
        let state = DashboardState::new(RiskEngine::default(), Position::new(1000.0, 200.0, 0.85));
        assert_eq!(state.ticks_applied(), 0);
        assert!((state.health().ratio_pct - 425.0).abs() < 1e-9);
        assert_eq!(state.health().health_score, 100.0);
        assert_eq!(state.health().band, HealthBand::Healthy);
    }
}
