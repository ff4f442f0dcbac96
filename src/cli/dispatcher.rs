use anyhow::Result;

use crate::cli::handlers::{self, commons::Session};

/// A built-in command that is not a backend operation.
struct BuiltinDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &Session) -> Result<i32>,
}

static BUILTIN_REGISTRY: &[BuiltinDefinition] = &[
    BuiltinDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    BuiltinDefinition {
        name: "help",
        aliases: &["describe"],
        handler: handlers::help::handle,
    },
];

fn find_builtin(name: &str) -> Option<&'static BuiltinDefinition> {
    BUILTIN_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes the trailing arguments: a built-in by name, otherwise `<verb> <noun> ...`.
/// Returns the exit code to terminate with.
pub fn dispatch(all_args: Vec<String>, session: &Session) -> Result<i32> {
    log::debug!("Dispatching args: {:?}", all_args);

    let Some(first) = all_args.first() else {
        println!("{}", t!("dispatch.welcome"));
        return Ok(0);
    };

    match find_builtin(first) {
        Some(builtin) => (builtin.handler)(all_args.into_iter().skip(1).collect(), session),
        None => handlers::invoke::handle(all_args, session),
    }
}
