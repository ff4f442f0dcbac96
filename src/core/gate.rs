// src/core/gate.rs

use crate::{error::CommandError, models::ConfirmImpact};

/// Asks the user whether to go ahead with an operation.
pub trait ConfirmationPrompt: Send + Sync {
    /// Returns `Ok(true)` when the user affirms.
    fn confirm(&self, message: &str) -> Result<bool, CommandError>;
}

/// A prompt that always gives the same answer. Used for non-interactive hosts.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmationPrompt for FixedAnswer {
    fn confirm(&self, _message: &str) -> Result<bool, CommandError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    PendingConfirmation,
    Proceed,
    Abort,
}

/// Decides whether a mutating operation may run. Starts pending and settles exactly
/// once; later calls to [`ConfirmationGate::resolve`] return the settled state.
#[derive(Debug)]
pub struct ConfirmationGate {
    state: GateState,
    force: bool,
    threshold: ConfirmImpact,
}

impl ConfirmationGate {
    pub fn new(force: bool, threshold: ConfirmImpact) -> Self {
        Self {
            state: GateState::PendingConfirmation,
            force,
            threshold,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Settles the gate for an operation of the given impact.
    ///
    /// Proceeds without asking when `force` is set, or when the operation's impact is
    /// below the threshold. Otherwise the prompt decides.
    pub fn resolve(
        &mut self,
        operation: &str,
        impact: ConfirmImpact,
        target: &str,
        prompt: &dyn ConfirmationPrompt,
    ) -> Result<GateState, CommandError> {
        if self.state != GateState::PendingConfirmation {
            return Ok(self.state);
        }

        let next = if self.force {
            log::debug!("Confirmation for '{}' bypassed by force flag", operation);
            GateState::Proceed
        } else if impact == ConfirmImpact::None || impact < self.threshold {
            GateState::Proceed
        } else {
            let message = format!(
                "Performing the operation \"{}\" on target \"{}\".",
                operation, target
            );
            if prompt.confirm(&message)? {
                GateState::Proceed
            } else {
                log::info!("Operation '{}' declined at confirmation", operation);
                GateState::Abort
            }
        };

        self.state = next;
        Ok(next)
    }
}
