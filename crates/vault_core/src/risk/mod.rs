//! Collateralization risk: position snapshot, engine, safety classification.

pub mod engine;
pub mod position;
pub mod safety;

pub use engine::{
    BorrowSuggestions, RiskAssessment, RiskEngine, RiskParams, collateral_value, compute_ratio,
};
pub use position::{Position, is_positive_amount, parse_amount};
pub use safety::{HealthBand, SafetyLevel};
