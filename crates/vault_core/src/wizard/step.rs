//! Wizard steps as a tagged union.
//!
//! **States:** `Start -> Amount -> Safety -> Review -> Finish`
//!
//! Each variant carries only what that step renders. The Safety and Review
//! steps hold the exact position and assessment the user is looking at, and
//! Finish holds the simulated receipt, so the rendered content cannot drift
//! from the step.

use crate::receipt::SimulatedReceipt;
use crate::risk::{Position, RiskAssessment};

/// Step discriminant, for ordering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKind {
    Start,
    Amount,
    Safety,
    Review,
    Finish,
}

impl StepKind {
    pub const ALL: [StepKind; 5] = [
        StepKind::Start,
        StepKind::Amount,
        StepKind::Safety,
        StepKind::Review,
        StepKind::Finish,
    ];

    /// Zero-based position in the flow (0..=4).
    pub fn index(self) -> usize {
        match self {
            StepKind::Start => 0,
            StepKind::Amount => 1,
            StepKind::Safety => 2,
            StepKind::Review => 3,
            StepKind::Finish => 4,
        }
    }

    /// Progress-bar label.
    pub fn label(self) -> &'static str {
        match self {
            StepKind::Start => "Start",
            StepKind::Amount => "Amount",
            StepKind::Safety => "Risks",
            StepKind::Review => "Review",
            StepKind::Finish => "Finish",
        }
    }

    pub fn previous(self) -> Option<StepKind> {
        match self {
            StepKind::Start => None,
            StepKind::Amount => Some(StepKind::Start),
            StepKind::Safety => Some(StepKind::Amount),
            StepKind::Review => Some(StepKind::Safety),
            StepKind::Finish => Some(StepKind::Review),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    Start,
    Amount,
    Safety {
        position: Position,
        assessment: RiskAssessment,
    },
    Review {
        position: Position,
        assessment: RiskAssessment,
    },
    Finish {
        receipt: SimulatedReceipt,
    },
}

impl WizardStep {
    pub fn kind(&self) -> StepKind {
        match self {
            WizardStep::Start => StepKind::Start,
            WizardStep::Amount => StepKind::Amount,
            WizardStep::Safety { .. } => StepKind::Safety,
            WizardStep::Review { .. } => StepKind::Review,
            WizardStep::Finish { .. } => StepKind::Finish,
        }
    }

    /// Whether this step ends the wizard.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardStep::Finish { .. })
    }
}
