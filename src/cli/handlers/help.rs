use anyhow::{Result, anyhow};
use colored::*;

use crate::{
    catalog,
    cli::handlers::commons::Session,
    models::{CommandSpec, ParameterSource},
};

pub fn handle(args: Vec<String>, _session: &Session) -> Result<i32> {
    let [verb, noun] = args.as_slice() else {
        return Err(anyhow!(t!("help.error.usage")));
    };
    let spec = catalog::find_command(verb, noun).ok_or_else(|| {
        anyhow!(t!("dispatch.error.unknown_command"), verb = verb, noun = noun)
    })?;

    print!("{}", describe(spec));
    Ok(0)
}

/// Renders the help page of one command.
fn describe(spec: &CommandSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", spec.name.bold(), spec.operation.dimmed()));
    out.push_str(&format!("{}\n\n", spec.about));
    out.push_str(&format!(
        t!("help.usage"),
        verb = spec.verb,
        noun = spec.noun
    ));
    out.push('\n');

    if spec.parameters.is_empty() {
        out.push_str(&format!("\n{}\n", t!("help.no_parameters")));
    } else {
        out.push_str(&format!("\n{}\n", t!("help.parameters").green().bold()));
        for def in spec.parameters {
            let mut notes = vec![def.kind.to_string()];
            if def.required {
                notes.push(t!("help.required").to_string());
            }
            match def.source {
                ParameterSource::Named => {}
                ParameterSource::Positional => notes.push("positional".to_string()),
                ParameterSource::Pipeline => notes.push("positional, stdin".to_string()),
            }
            let flag = format!("--{:<32}", def.name);
            out.push_str(&format!("  {} {}", flag.cyan(), notes.join(", ")));
            if !def.aliases.is_empty() {
                out.push_str(&format!("  (alias: {})", def.aliases.join(", ")).dimmed().to_string());
            }
            out.push('\n');
        }
    }

    out.push_str(&format!(
        "\n{} {}\n{} {}\n",
        t!("help.default_select"),
        spec.default_select.cyan(),
        t!("help.confirm_impact"),
        spec.confirm_impact
    ));
    out
}
