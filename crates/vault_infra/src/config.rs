//! Onboarding configuration defaults.
//!
//! Every parameter has a default. An explicit value overrides it; a
//! non-finite or negative value, an unknown parameter name, or a threshold
//! table that is not ordered fails closed.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use vault_core::risk::RiskParams;

use crate::price_feed::PriceFeedConfig;

/// All tunable onboarding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigParam {
    // Risk engine
    LiquidationThresholdPct,
    VerySafeRatioPct,
    SafeRatioPct,
    RiskyRatioPct,
    RecommendedTargetRatioPct,
    MaxSafeTargetRatioPct,
    HealthFloorRatioPct,
    HealthCeilingRatioPct,
    WarningRatioPct,

    // Simulated price feed
    InitialAssetPrice,
    PriceTickPeriodMs,
    PriceTickMaxDelta,
    PriceFloor,
}

/// Error when a parameter value cannot be used.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidConfigError {
    pub param_name: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for InvalidConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "config fail-closed: '{}' is unusable ({})",
            self.param_name, self.reason
        )
    }
}

impl std::error::Error for InvalidConfigError {}

/// Error resolving a full `OnboardingConfig`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Param(InvalidConfigError),
    UnknownParam { name: String },
    Parse { reason: String },
    /// Safety table or health span not ordered.
    InvalidThresholds,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Param(e) => e.fmt(f),
            ConfigError::UnknownParam { name } => write!(f, "unknown config parameter '{name}'"),
            ConfigError::Parse { reason } => write!(f, "config parse failed: {reason}"),
            ConfigError::InvalidThresholds => {
                write!(f, "risk thresholds must be positive and ordered")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<InvalidConfigError> for ConfigError {
    fn from(e: InvalidConfigError) -> Self {
        ConfigError::Param(e)
    }
}

/// Default for a parameter. The table is total.
pub fn default_value(param: ConfigParam) -> f64 {
    match param {
        ConfigParam::LiquidationThresholdPct => 150.0,
        ConfigParam::VerySafeRatioPct => 300.0,
        ConfigParam::SafeRatioPct => 200.0,
        ConfigParam::RiskyRatioPct => 170.0,
        ConfigParam::RecommendedTargetRatioPct => 400.0,
        ConfigParam::MaxSafeTargetRatioPct => 300.0,
        ConfigParam::HealthFloorRatioPct => 150.0,
        ConfigParam::HealthCeilingRatioPct => 300.0,
        ConfigParam::WarningRatioPct => 200.0,

        ConfigParam::InitialAssetPrice => 0.85,
        ConfigParam::PriceTickPeriodMs => 5000.0,
        ConfigParam::PriceTickMaxDelta => 0.01,
        ConfigParam::PriceFloor => 0.1,
    }
}

/// snake_case name, as used in config files.
pub fn param_name(param: ConfigParam) -> &'static str {
    match param {
        ConfigParam::LiquidationThresholdPct => "liquidation_threshold_pct",
        ConfigParam::VerySafeRatioPct => "very_safe_ratio_pct",
        ConfigParam::SafeRatioPct => "safe_ratio_pct",
        ConfigParam::RiskyRatioPct => "risky_ratio_pct",
        ConfigParam::RecommendedTargetRatioPct => "recommended_target_ratio_pct",
        ConfigParam::MaxSafeTargetRatioPct => "max_safe_target_ratio_pct",
        ConfigParam::HealthFloorRatioPct => "health_floor_ratio_pct",
        ConfigParam::HealthCeilingRatioPct => "health_ceiling_ratio_pct",
        ConfigParam::WarningRatioPct => "warning_ratio_pct",
        ConfigParam::InitialAssetPrice => "initial_asset_price",
        ConfigParam::PriceTickPeriodMs => "price_tick_period_ms",
        ConfigParam::PriceTickMaxDelta => "price_tick_max_delta",
        ConfigParam::PriceFloor => "price_floor",
    }
}

/// Expected number of ConfigParam variants. Update when adding new variants.
pub const EXPECTED_PARAM_COUNT: usize = 13;

/// All known `ConfigParam` variants (for exhaustive iteration).
pub const ALL_PARAMS: &[ConfigParam] = &[
    ConfigParam::LiquidationThresholdPct,
    ConfigParam::VerySafeRatioPct,
    ConfigParam::SafeRatioPct,
    ConfigParam::RiskyRatioPct,
    ConfigParam::RecommendedTargetRatioPct,
    ConfigParam::MaxSafeTargetRatioPct,
    ConfigParam::HealthFloorRatioPct,
    ConfigParam::HealthCeilingRatioPct,
    ConfigParam::WarningRatioPct,
    ConfigParam::InitialAssetPrice,
    ConfigParam::PriceTickPeriodMs,
    ConfigParam::PriceTickMaxDelta,
    ConfigParam::PriceFloor,
];

pub fn param_from_name(name: &str) -> Option<ConfigParam> {
    ALL_PARAMS.iter().copied().find(|&p| param_name(p) == name)
}

/// Resolve a configuration value.
///
/// - `Some(v)` wins if finite and non-negative.
/// - `None` falls back to the default.
/// - non-finite or negative -> `Err` (fail-closed).
pub fn resolve_config_value(
    param: ConfigParam,
    value: Option<f64>,
) -> Result<f64, InvalidConfigError> {
    if let Some(v) = value {
        if !v.is_finite() {
            return Err(InvalidConfigError {
                param_name: param_name(param),
                reason: "value is non-finite (NaN or Infinity); fail-closed",
            });
        }
        if v < 0.0 {
            return Err(InvalidConfigError {
                param_name: param_name(param),
                reason: "value is negative; all config params must be non-negative",
            });
        }
        return Ok(v);
    }
    Ok(default_value(param))
}

/// Fully resolved onboarding configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingConfig {
    pub risk: RiskParams,
    pub feed: PriceFeedConfig,
    /// Price the wizard assesses at and the dashboard feed starts from.
    pub initial_asset_price: f64,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            risk: RiskParams::default(),
            feed: PriceFeedConfig::default(),
            initial_asset_price: 0.85,
        }
    }
}

impl OnboardingConfig {
    /// Resolve every parameter from a name -> value map; absent names take
    /// their default.
    pub fn from_values(values: &HashMap<String, f64>) -> Result<Self, ConfigError> {
        for name in values.keys() {
            if param_from_name(name).is_none() {
                return Err(ConfigError::UnknownParam { name: name.clone() });
            }
        }
        let get = |param: ConfigParam| {
            resolve_config_value(param, values.get(param_name(param)).copied())
        };

        let risk = RiskParams {
            liquidation_threshold_pct: get(ConfigParam::LiquidationThresholdPct)?,
            very_safe_ratio_pct: get(ConfigParam::VerySafeRatioPct)?,
            safe_ratio_pct: get(ConfigParam::SafeRatioPct)?,
            risky_ratio_pct: get(ConfigParam::RiskyRatioPct)?,
            recommended_target_ratio_pct: get(ConfigParam::RecommendedTargetRatioPct)?,
            max_safe_target_ratio_pct: get(ConfigParam::MaxSafeTargetRatioPct)?,
            health_floor_ratio_pct: get(ConfigParam::HealthFloorRatioPct)?,
            health_ceiling_ratio_pct: get(ConfigParam::HealthCeilingRatioPct)?,
            warning_ratio_pct: get(ConfigParam::WarningRatioPct)?,
        };
        if !risk.is_valid() {
            return Err(ConfigError::InvalidThresholds);
        }

        let feed = PriceFeedConfig {
            period: Duration::from_millis(get(ConfigParam::PriceTickPeriodMs)? as u64),
            max_delta: get(ConfigParam::PriceTickMaxDelta)?,
            floor: get(ConfigParam::PriceFloor)?,
        };
        if feed.period.is_zero() {
            return Err(ConfigError::Param(InvalidConfigError {
                param_name: param_name(ConfigParam::PriceTickPeriodMs),
                reason: "tick period must be at least 1ms",
            }));
        }

        Ok(Self {
            risk,
            feed,
            initial_asset_price: get(ConfigParam::InitialAssetPrice)?,
        })
    }

    /// Resolve from a flat JSON object of `{"param_name": number}`.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let values: HashMap<String, f64> =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse {
                reason: e.to_string(),
            })?;
        Self::from_values(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_defaults_resolve() {
        for &param in ALL_PARAMS {
            assert_eq!(
                resolve_config_value(param, None),
                Ok(default_value(param)),
                "ConfigParam::{:?} ({}) default does not resolve",
                param,
                param_name(param),
            );
        }
    }

    #[test]
    fn all_params_listed_in_constant() {
        assert_eq!(ALL_PARAMS.len(), EXPECTED_PARAM_COUNT);
        let mut names: Vec<&str> = ALL_PARAMS.iter().map(|&p| param_name(p)).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ALL_PARAMS.len(), "ALL_PARAMS has duplicate entries");
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for &param in ALL_PARAMS {
            assert_eq!(param_from_name(param_name(param)), Some(param));
        }
        assert_eq!(param_from_name("nope"), None);
    }

    #[test]
    fn empty_values_match_default_config() {
        let config = OnboardingConfig::from_values(&HashMap::new()).unwrap();
        assert_eq!(config, OnboardingConfig::default());
    }
}
