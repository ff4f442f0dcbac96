// src/core/pipeline.rs

use crate::{
    CancellationToken,
    client::BackendClient,
    core::{
        binder::{self, InvocationInput},
        context::{BindingMode, ExecutionContext, build_context},
        gate::{ConfirmationGate, ConfirmationPrompt, GateState},
        invoker, mapper,
    },
    error::CommandError,
    models::{CommandSpec, ConfirmImpact, InvocationResult},
};

/// Per-invocation switches that do not come from the command's own parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOptions {
    /// Custom select expression; the command default applies when `None`.
    pub select: Option<String>,
    /// Skip the confirmation prompt.
    pub force: bool,
    pub mode: BindingMode,
    /// Operations at or above this impact are confirmed first.
    pub confirm_threshold: ConfirmImpact,
}

impl Default for InvocationOptions {
    fn default() -> Self {
        Self {
            select: None,
            force: false,
            mode: BindingMode::Strict,
            confirm_threshold: ConfirmImpact::Medium,
        }
    }
}

/// Everything that happens before the network: binding, context, confirmation.
/// `Ok(None)` means the gate aborted.
fn prepare(
    spec: &'static CommandSpec,
    input: &InvocationInput,
    options: &InvocationOptions,
    prompt: &dyn ConfirmationPrompt,
) -> Result<Option<ExecutionContext>, CommandError> {
    let bound = binder::bind(spec, input)?;
    let ctx = build_context(spec, bound, options.select.as_deref(), options.mode)?;

    let mut gate = ConfirmationGate::new(options.force, options.confirm_threshold);
    match gate.resolve(spec.name, spec.confirm_impact, &ctx.target(), prompt)? {
        GateState::Proceed => Ok(Some(ctx)),
        GateState::Abort | GateState::PendingConfirmation => Ok(None),
    }
}

/// Runs one command end to end: bind, build context, confirm, map, invoke, project.
///
/// Never fails outright. Pre-flight errors come back as `Failure` without any request
/// having been built; a declined confirmation comes back as `Aborted`.
pub async fn execute(
    spec: &'static CommandSpec,
    input: &InvocationInput,
    options: &InvocationOptions,
    client: &dyn BackendClient,
    prompt: &dyn ConfirmationPrompt,
    cancellation_token: &CancellationToken,
) -> InvocationResult {
    let ctx = match prepare(spec, input, options, prompt) {
        Ok(Some(ctx)) => ctx,
        Ok(None) => return InvocationResult::Aborted,
        // A prompt that broke because the user hit Ctrl+C is a cancellation.
        Err(CommandError::Prompt(reason)) if cancellation_token.is_cancelled() => {
            log::debug!("Confirmation for '{}' interrupted: {}", spec.name, reason);
            return InvocationResult::Failure(CommandError::Cancelled);
        }
        Err(e) => {
            log::debug!("'{}' rejected before any request was built: {}", spec.name, e);
            return InvocationResult::Failure(e);
        }
    };

    // A stop signal that arrived during the prompt must not start a call.
    if cancellation_token.is_cancelled() {
        return InvocationResult::Failure(CommandError::Cancelled);
    }

    let request = mapper::map_request(&ctx);
    invoker::invoke(client, &ctx, request, cancellation_token).await
}
