// src/cli/handlers/invoke.rs

use anyhow::{Context, Result, anyhow};
use colored::*;
use std::io::Read;

use crate::{
    catalog,
    cli::{
        args,
        handlers::commons::{self, Session, TerminalPrompt},
    },
    core::pipeline::{self, InvocationOptions},
    error::CommandError,
    models::{CommandSpec, InvocationResult},
};

/// Runs `<verb> <noun> [parameters...]` and returns the process exit code.
pub fn handle(tokens: Vec<String>, session: &Session) -> Result<i32> {
    let (verb, noun, rest) = match tokens.as_slice() {
        [verb, noun, rest @ ..] => (verb, noun, rest),
        [verb] => return Err(anyhow!(t!("dispatch.error.missing_noun"), verb = verb)),
        [] => return Err(anyhow!(t!("help.error.usage"))),
    };
    let spec = catalog::find_command(verb, noun).ok_or_else(|| {
        anyhow!(t!("dispatch.error.unknown_command"), verb = verb, noun = noun)
    })?;

    // 1. Split the tokens and read the piped value if `-` was given.
    let line = args::parse_command_line(spec, rest)?;
    let options = InvocationOptions {
        select: line.select.clone(),
        force: line.force,
        mode: session.settings.binding_mode,
        confirm_threshold: session.settings.confirm_threshold,
    };
    let input = line.into_input(|| {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context(t!("invoke.error.stdin"))?;
        Ok(buffer)
    })?;

    // 2. Run the pipeline. Ctrl+C only cancels; the pipeline decides what that means.
    let client = session.settings.build_client()?;
    let token = session.cancellation_token.clone();
    let interrupt = token.clone();
    session.runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::debug!("Ctrl+C received, cancelling invocation");
            interrupt.cancel();
        }
    });

    log::info!("Invoking '{}' against {}", spec.name, client.endpoint());
    let result = session.runtime.block_on(pipeline::execute(
        spec,
        &input,
        &options,
        client.as_ref(),
        &TerminalPrompt::new(token.clone()),
        &token,
    ));

    // 3. Report.
    report(spec, &result)?;
    Ok(result.exit_code())
}

fn report(spec: &CommandSpec, result: &InvocationResult) -> Result<()> {
    match result {
        InvocationResult::Success { output, .. } => commons::print_output(output)?,
        InvocationResult::Aborted => {
            println!("{}", format!(t!("invoke.info.aborted"), command = spec.name).yellow());
        }
        InvocationResult::Failure(e) if result.is_cancelled() => {
            log::debug!("'{}' cancelled: {}", spec.name, e);
            eprintln!("\n{}", t!("common.info.operation_cancelled").yellow());
        }
        InvocationResult::Failure(e) => {
            eprintln!("\n{}: {}", t!("common.error").red().bold(), e);
            if let Some(hint) = failure_hint(spec, e) {
                eprintln!("{}", hint.dimmed());
            }
        }
    }
    Ok(())
}

/// Input mistakes point at the command's help page; backend failures do not.
fn failure_hint(spec: &CommandSpec, error: &CommandError) -> Option<String> {
    (error.is_pre_flight() && !matches!(error, CommandError::Prompt(_)))
        .then(|| format!(t!("invoke.hint.help"), verb = spec.verb, noun = spec.noun))
}
