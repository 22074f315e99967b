//! Discrete buckets over the continuous ratio and health figures.

/// User-facing classification of a collateralization ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyLevel {
    VerySafe,
    Safe,
    Risky,
    Danger,
    /// No debt, or inputs incomplete.
    Unknown,
}

impl SafetyLevel {
    pub fn message(self) -> &'static str {
        match self {
            SafetyLevel::VerySafe => "Extremely Safe! STX is solid.",
            SafetyLevel::Safe => "Good safety buffer.",
            SafetyLevel::Risky => "Getting a bit tight.",
            SafetyLevel::Danger => "High liquidation risk!",
            SafetyLevel::Unknown => "",
        }
    }

    pub fn is_known(self) -> bool {
        self != SafetyLevel::Unknown
    }
}

/// Coarse band over the 0-100 health score, used for the dashboard gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthBand {
    Healthy,
    Caution,
    Critical,
}

impl HealthBand {
    /// `> 60` Healthy, `> 30` Caution, otherwise Critical.
    pub fn from_score(score: f64) -> Self {
        if score > 60.0 {
            HealthBand::Healthy
        } else if score > 30.0 {
            HealthBand::Caution
        } else {
            HealthBand::Critical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_band_edges_are_exclusive() {
        assert_eq!(HealthBand::from_score(100.0), HealthBand::Healthy);
        assert_eq!(HealthBand::from_score(60.0), HealthBand::Caution);
        assert_eq!(HealthBand::from_score(30.0), HealthBand::Critical);
        assert_eq!(HealthBand::from_score(0.0), HealthBand::Critical);
    }

    #[test]
    fn unknown_has_no_message() {
        assert!(SafetyLevel::Unknown.message().is_empty());
        assert!(!SafetyLevel::Unknown.is_known());
        assert_eq!(SafetyLevel::Danger.message(), "High liquidation risk!");
    }
}
