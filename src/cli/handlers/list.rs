use anyhow::Result;
use colored::*;

use crate::{catalog, cli::handlers::commons::Session};

pub fn handle(_args: Vec<String>, _session: &Session) -> Result<i32> {
    println!("{}", t!("list.header").bold());

    let width = catalog::all()
        .iter()
        .map(|spec| spec.verb.len() + spec.noun.len() + 1)
        .max()
        .unwrap_or(0);

    for spec in catalog::all() {
        let usage = format!("{:<width$}", format!("{} {}", spec.verb, spec.noun));
        // Mutating commands ask for confirmation unless --force is given.
        let marker = if spec.is_mutating() { "*".red() } else { " ".normal() };
        println!("  {}{}  {}", marker, usage.cyan(), spec.about.dimmed());
    }
    Ok(0)
}
