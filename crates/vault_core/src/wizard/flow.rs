//! Wizard flow controller.
//!
//! Transition rules:
//! - `Start -> Amount` needs a connected wallet session.
//! - `Amount -> Safety` needs both amount fields to parse to a positive number.
//! - `Safety -> Review` and `Review -> Finish` are unconditional. A Danger
//!   classification is shown, not enforced.
//! - Back moves may jump to any earlier step, except out of Finish.
//! - Forward skips are impossible: `advance` only ever moves one step.
//!
//! A blocked move is a `TransitionResult::Blocked` value, never an error.
//! Amount edits re-derive the risk assessment synchronously on every change.

use crate::receipt::SimulatedReceipt;
use crate::risk::{
    BorrowSuggestions, Position, RiskAssessment, RiskEngine, is_positive_amount, parse_amount,
};
use crate::session::{WalletAddress, WalletSession};

use super::step::{StepKind, WizardStep};

// ─── Inputs ─────────────────────────────────────────────────────────────

/// Raw text of the two amount fields, kept across back navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AmountInputs {
    pub collateral: String,
    pub borrow: String,
}

impl AmountInputs {
    /// Both fields present and positive.
    pub fn is_complete(&self) -> bool {
        is_positive_amount(&self.collateral) && is_positive_amount(&self.borrow)
    }
}

// ─── Transition result ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// `Start -> Amount` without a wallet session.
    WalletNotConnected,
    /// `Amount -> Safety` with a missing or non-positive amount.
    AmountsIncomplete,
    /// Finish is terminal.
    AlreadyFinished,
    /// Back move to the current step or a later one.
    NotBackward { target: StepKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    Advanced { from: StepKind, to: StepKind },
    MovedBack { from: StepKind, to: StepKind },
    Blocked { current: StepKind, reason: BlockReason },
}

impl TransitionResult {
    pub fn is_blocked(&self) -> bool {
        matches!(self, TransitionResult::Blocked { .. })
    }
}

// ─── Metrics ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct WizardMetrics {
    advanced_total: u64,
    back_total: u64,
    blocked_total: u64,
}

impl WizardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advanced_total(&self) -> u64 {
        self.advanced_total
    }

    pub fn back_total(&self) -> u64 {
        self.back_total
    }

    pub fn blocked_total(&self) -> u64 {
        self.blocked_total
    }

    fn record_advanced(&mut self) {
        self.advanced_total += 1;
    }

    fn record_back(&mut self) {
        self.back_total += 1;
    }

    fn record_blocked(&mut self) {
        self.blocked_total += 1;
    }
}

// ─── Flow ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct WizardFlow {
    engine: RiskEngine,
    asset_price: f64,
    step: WizardStep,
    inputs: AmountInputs,
    assessment: RiskAssessment,
    metrics: WizardMetrics,
}

impl WizardFlow {
    /// New flow at `Start` with empty amounts, priced at `asset_price`.
    pub fn new(engine: RiskEngine, asset_price: f64) -> Self {
        Self {
            engine,
            asset_price,
            step: WizardStep::Start,
            inputs: AmountInputs::default(),
            assessment: RiskAssessment::empty(),
            metrics: WizardMetrics::new(),
        }
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn kind(&self) -> StepKind {
        self.step.kind()
    }

    pub fn inputs(&self) -> &AmountInputs {
        &self.inputs
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    pub fn asset_price(&self) -> f64 {
        self.asset_price
    }

    pub fn metrics(&self) -> &WizardMetrics {
        &self.metrics
    }

    /// Position parsed from the current inputs; garbage reads as zero.
    pub fn position(&self) -> Position {
        Position::from_inputs(&self.inputs.collateral, &self.inputs.borrow, self.asset_price)
    }

    /// Assessment of the current inputs, as of the last edit.
    pub fn assessment(&self) -> &RiskAssessment {
        &self.assessment
    }

    /// Step index over 4, as a percentage.
    pub fn progress_pct(&self) -> f64 {
        self.kind().index() as f64 / 4.0 * 100.0
    }

    pub fn is_finished(&self) -> bool {
        self.step.is_terminal()
    }

    pub fn receipt(&self) -> Option<&SimulatedReceipt> {
        match &self.step {
            WizardStep::Finish { receipt } => Some(receipt),
            _ => None,
        }
    }

    // ─── Amount editing ─────────────────────────────────────────────────

    /// Edit the collateral field. Only applies on the Amount step.
    pub fn set_collateral_input(&mut self, text: impl Into<String>) -> bool {
        if !self.editable() {
            return false;
        }
        self.inputs.collateral = text.into();
        self.recompute();
        true
    }

    /// Edit the borrow field. Only applies on the Amount step.
    pub fn set_borrow_input(&mut self, text: impl Into<String>) -> bool {
        if !self.editable() {
            return false;
        }
        self.inputs.borrow = text.into();
        self.recompute();
        true
    }

    /// Suggested borrow amounts for the entered collateral; zero while the
    /// collateral field is empty.
    pub fn suggestions(&self) -> BorrowSuggestions {
        if self.inputs.collateral.trim().is_empty() {
            return BorrowSuggestions {
                recommended: 0.0,
                max_safe: 0.0,
            };
        }
        self.engine
            .suggestions(parse_amount(&self.inputs.collateral), self.asset_price)
    }

    /// Fill the borrow field with the recommended amount, rounded to a whole unit.
    pub fn apply_recommended_borrow(&mut self) -> bool {
        let amount = self.suggestions().recommended;
        self.set_borrow_input(format_whole(amount))
    }

    /// Fill the borrow field with the max safe amount, rounded to a whole unit.
    pub fn apply_max_safe_borrow(&mut self) -> bool {
        let amount = self.suggestions().max_safe;
        self.set_borrow_input(format_whole(amount))
    }

    // ─── Navigation ─────────────────────────────────────────────────────

    /// Where `advance` would go, or why it cannot. Drives the enabled state
    /// of the forward control without moving.
    pub fn can_advance(&self, session: &impl WalletSession) -> Result<StepKind, BlockReason> {
        match &self.step {
            WizardStep::Start => {
                if session.is_connected() {
                    Ok(StepKind::Amount)
                } else {
                    Err(BlockReason::WalletNotConnected)
                }
            }
            WizardStep::Amount => {
                if self.inputs.is_complete() {
                    Ok(StepKind::Safety)
                } else {
                    Err(BlockReason::AmountsIncomplete)
                }
            }
            WizardStep::Safety { .. } => Ok(StepKind::Review),
            WizardStep::Review { .. } => Ok(StepKind::Finish),
            WizardStep::Finish { .. } => Err(BlockReason::AlreadyFinished),
        }
    }

    /// Move one step forward if the guard for the current step passes.
    pub fn advance(&mut self, session: &impl WalletSession) -> TransitionResult {
        let from = self.kind();
        let to = match self.can_advance(session) {
            Ok(to) => to,
            Err(reason) => return self.blocked(reason),
        };

        let next = self.enter(to, session);
        self.step = next;
        self.metrics.record_advanced();
        TransitionResult::Advanced { from, to }
    }

    /// Jump back to any earlier step. Finish cannot be left this way.
    pub fn back_to(&mut self, target: StepKind) -> TransitionResult {
        let from = self.kind();
        if from == StepKind::Finish {
            return self.blocked(BlockReason::AlreadyFinished);
        }
        if target >= from {
            return self.blocked(BlockReason::NotBackward { target });
        }
        self.step = self.enter(target, &None::<WalletAddress>);
        self.metrics.record_back();
        TransitionResult::MovedBack { from, to: target }
    }

    /// Back to the immediately preceding step.
    pub fn back(&mut self) -> TransitionResult {
        match self.kind().previous() {
            Some(target) => self.back_to(target),
            None => self.blocked(BlockReason::NotBackward {
                target: StepKind::Start,
            }),
        }
    }

    /// Return to `Start` with empty amounts. Metrics survive.
    pub fn reset(&mut self) {
        self.step = WizardStep::Start;
        self.inputs = AmountInputs::default();
        self.assessment = RiskAssessment::empty();
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn editable(&self) -> bool {
        if self.kind() == StepKind::Amount {
            return true;
        }
        tracing::debug!("AmountEditIgnored step={:?}", self.kind());
        false
    }

    fn recompute(&mut self) {
        self.assessment = self.engine.assess(&self.position());
    }

    /// Build the step value for `kind` from the current inputs.
    ///
    /// Inputs only change on the Amount step, so re-deriving here yields the
    /// same figures the user saw on the way forward.
    fn enter(&mut self, kind: StepKind, session: &impl WalletSession) -> WizardStep {
        self.recompute();
        let position = self.position();
        let assessment = self.assessment;
        match kind {
            StepKind::Start => WizardStep::Start,
            StepKind::Amount => WizardStep::Amount,
            StepKind::Safety => WizardStep::Safety {
                position,
                assessment,
            },
            StepKind::Review => WizardStep::Review {
                position,
                assessment,
            },
            StepKind::Finish => {
                let receipt = SimulatedReceipt::new(session.address().cloned(), position);
                tracing::info!(
                    "WizardFinished receipt_id={} safety={:?}",
                    receipt.receipt_id_hex(),
                    assessment.safety_level
                );
                WizardStep::Finish { receipt }
            }
        }
    }

    fn blocked(&mut self, reason: BlockReason) -> TransitionResult {
        self.metrics.record_blocked();
        let current = self.kind();
        tracing::debug!("WizardTransitionBlocked step={:?} reason={:?}", current, reason);
        TransitionResult::Blocked { current, reason }
    }
}

/// Round half away from zero and drop the fraction: `212.5 -> "213"`.
fn format_whole(amount: f64) -> String {
    format!("{:.0}", amount.round())
}
