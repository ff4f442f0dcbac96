// src/bin/hubcmd.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use hubcmd::{
    cli::{Cli, dispatcher, handlers::commons::Session},
    config,
    core::context::BindingMode,
};

/// Sets up logging, resolves settings, dispatches, and turns the outcome into an exit code.
fn main() {
    let cli = Cli::parse();

    // Warnings (e.g. legacy-mode placeholders) are shown by default; RUST_LOG still wins.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run_cli(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("\n{}: {}", hubcmd::t!("common.error").red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run_cli(cli: Cli) -> Result<i32> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(region) = cli.region {
        settings.region = region;
    }
    if let Some(endpoint) = cli.endpoint_url {
        settings.endpoint_url = Some(endpoint);
    }
    if cli.legacy {
        settings.binding_mode = BindingMode::Legacy;
    }

    let session = Session::new(settings)?;
    dispatcher::dispatch(cli.args, &session)
}
