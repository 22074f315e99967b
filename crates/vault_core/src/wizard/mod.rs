//! Five-step onboarding wizard.

pub mod flow;
pub mod step;

pub use flow::{AmountInputs, BlockReason, TransitionResult, WizardFlow, WizardMetrics};
pub use step::{StepKind, WizardStep};
