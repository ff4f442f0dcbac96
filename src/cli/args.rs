// src/cli/args.rs

use anyhow::{Result, anyhow};

use crate::{
    core::binder::{self, InvocationInput},
    models::{CommandSpec, ParameterType},
};

/// Where the command's single unnamed value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnnamedValue {
    Literal(String),
    /// `-` on the command line: read the value from standard input.
    Stdin,
}

/// The tokens after `<verb> <noun>`, split into parameter input and invocation switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    /// Named parameter values, exactly as given. Binding happens later.
    pub named: Vec<(String, Option<String>)>,
    pub unnamed: Option<UnnamedValue>,
    pub select: Option<String>,
    pub force: bool,
}

impl CommandLine {
    /// Builds the binder input. `read_stdin` is only called when `-` was given.
    pub fn into_input(self, read_stdin: impl FnOnce() -> Result<String>) -> Result<InvocationInput> {
        let positional = match self.unnamed {
            None => None,
            Some(UnnamedValue::Literal(value)) => Some(value),
            Some(UnnamedValue::Stdin) => Some(read_stdin()?.trim().to_string()),
        };
        Ok(InvocationInput {
            named: self.named,
            positional,
        })
    }
}

/// `--name` and `-Name` are flags; `-5` and `-` are values.
fn flag_name(token: &str) -> Option<&str> {
    if let Some(name) = token.strip_prefix("--") {
        return (!name.is_empty()).then_some(name);
    }
    token
        .strip_prefix('-')
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_alphabetic()))
}

fn is_switch_literal(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "1" | "0"
    )
}

/// Splits the tokens of one command invocation.
///
/// # Logic:
/// - `--Name value` and `--Name=value` give a named value.
/// - A Boolean parameter may appear bare (`--EnableDefaultStandard`); it only takes the
///   next token when that token is a switch literal such as `false`.
/// - `--select <expr>` and `--force` belong to the invocation, not the command. Like a
///   Boolean parameter, `--force` takes a following switch literal (`--force false`).
/// - At most one bare token is accepted as the unnamed value; `-` means standard input.
/// - After `--`, every token is a value.
pub fn parse_command_line(spec: &CommandSpec, tokens: &[String]) -> Result<CommandLine> {
    let mut line = CommandLine::default();
    let mut tokens = tokens.iter().map(String::as_str).peekable();
    let mut only_values = false;

    while let Some(token) = tokens.next() {
        if !only_values && token == "--" {
            only_values = true;
            continue;
        }

        let flag = if only_values { None } else { flag_name(token) };
        let Some(flag) = flag else {
            let value = if token == "-" && !only_values {
                UnnamedValue::Stdin
            } else {
                UnnamedValue::Literal(token.to_string())
            };
            set_unnamed(&mut line, spec, value)?;
            continue;
        };

        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };

        if name.eq_ignore_ascii_case("select") {
            let expr = match inline {
                Some(expr) => expr,
                None => tokens
                    .next()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!(t!("invoke.error.missing_value"), flag = name))?,
            };
            line.select = Some(expr);
            continue;
        }

        if name.eq_ignore_ascii_case("force") {
            let value = inline.or_else(|| {
                tokens
                    .next_if(|next| is_switch_literal(next))
                    .map(str::to_string)
            });
            line.force = value.is_none_or(|v| !is_false(&v));
            continue;
        }

        let is_switch = binder::resolve_parameter(spec, name)
            .is_some_and(|def| def.kind == ParameterType::Boolean);
        let value = match inline {
            Some(value) => Some(value),
            None if is_switch => tokens
                .next_if(|next| is_switch_literal(next))
                .map(str::to_string),
            None => tokens
                .next_if(|next| flag_name(next).is_none())
                .map(str::to_string),
        };
        line.named.push((name.to_string(), value));
    }

    log::trace!("Parsed command line for '{}': {:?}", spec.name, line);
    Ok(line)
}

fn is_false(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "false" | "no" | "off" | "0")
}

fn set_unnamed(line: &mut CommandLine, spec: &CommandSpec, value: UnnamedValue) -> Result<()> {
    if line.unnamed.is_some() {
        let shown = match &value {
            UnnamedValue::Literal(v) => v.as_str(),
            UnnamedValue::Stdin => "-",
        };
        return Err(anyhow!(
            t!("invoke.error.extra_positional"),
            value = shown,
            command = spec.name
        ));
    }
    line.unnamed = Some(value);
    Ok(())
}
