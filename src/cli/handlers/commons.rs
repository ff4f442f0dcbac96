// src/cli/handlers/commons.rs

// Shared state and terminal helpers used by several handlers.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use serde_json::Value;
use std::io::{self, IsTerminal};

use crate::{
    CancellationToken,
    config::Settings,
    core::gate::ConfirmationPrompt,
    error::CommandError,
};

/// What every handler gets: resolved settings, the async runtime backend calls run on,
/// and the token Ctrl+C cancels.
#[derive(Debug)]
pub struct Session {
    pub settings: Settings,
    pub runtime: tokio::runtime::Runtime,
    pub cancellation_token: CancellationToken,
}

impl Session {
    pub fn new(settings: Settings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            settings,
            runtime,
            cancellation_token: CancellationToken::new(),
        })
    }
}

/// Asks on the terminal. Without one there is nobody to ask, so the answer is "no".
#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    cancellation_token: CancellationToken,
}

impl TerminalPrompt {
    /// Ctrl+C at the prompt cancels `cancellation_token`.
    pub fn new(cancellation_token: CancellationToken) -> Self {
        Self { cancellation_token }
    }

    /// In raw mode Ctrl+C arrives as an interrupted read rather than a signal.
    fn failure(&self, error: dialoguer::Error) -> CommandError {
        let interrupted = matches!(
            &error,
            dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted
        );
        if interrupted {
            self.cancellation_token.cancel();
        }
        CommandError::Prompt(error.to_string())
    }
}

impl ConfirmationPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool, CommandError> {
        if !io::stdin().is_terminal() {
            eprintln!("{}", t!("prompt.non_interactive").yellow());
            return Ok(false);
        }

        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(t!("prompt.question"), message = message))
            .default(false)
            .interact()
            .map_err(|e| self.failure(e))
    }
}

/// Prints a command's output. `null` prints nothing, strings print bare, everything
/// else prints as pretty JSON.
pub fn print_output(output: &Value) -> Result<()> {
    match output {
        Value::Null => {}
        Value::String(s) => println!("{}", s),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}
