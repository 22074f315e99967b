//! Position snapshot and amount-input parsing.
//!
//! Amount fields arrive as free text from the Amount step. Parsing is total:
//! anything that is not a finite, non-negative number reads as `0.0`.

/// Collateral, debt and price triple that every risk figure derives from.
///
/// Invariant: every field is finite and `>= 0`. Constructors sanitize their
/// inputs instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    collateral_amount: f64,
    borrow_amount: f64,
    asset_price: f64,
}

impl Position {
    pub fn new(collateral_amount: f64, borrow_amount: f64, asset_price: f64) -> Self {
        Self {
            collateral_amount: sanitize(collateral_amount),
            borrow_amount: sanitize(borrow_amount),
            asset_price: sanitize(asset_price),
        }
    }

    /// Build a position from raw input text plus a known price.
    pub fn from_inputs(collateral: &str, borrow: &str, asset_price: f64) -> Self {
        Self::new(parse_amount(collateral), parse_amount(borrow), asset_price)
    }

    pub fn collateral_amount(&self) -> f64 {
        self.collateral_amount
    }

    pub fn borrow_amount(&self) -> f64 {
        self.borrow_amount
    }

    pub fn asset_price(&self) -> f64 {
        self.asset_price
    }

    /// Same amounts at a different price (dashboard feed).
    pub fn with_price(&self, asset_price: f64) -> Self {
        Self {
            asset_price: sanitize(asset_price),
            ..*self
        }
    }

    pub fn has_debt(&self) -> bool {
        self.borrow_amount > 0.0
    }
}

/// Parse an amount field for display. Empty, non-numeric, non-finite or
/// negative text reads as `0.0`.
pub fn parse_amount(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) => sanitize(v),
        Err(_) => 0.0,
    }
}

/// Whether an amount field is present and parses to a positive number.
///
/// This is the gating predicate; `parse_amount` is the display value.
pub fn is_positive_amount(text: &str) -> bool {
    parse_amount(text) > 0.0
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
