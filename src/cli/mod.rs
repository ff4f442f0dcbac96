use clap::Parser;
use std::path::PathBuf;

pub mod args;
pub mod dispatcher;
pub mod handlers;

/// Renders the semantic help template (`<title>`, `<cmd>`, ...) into ANSI styles.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();
    let style = |code: &'static str| if use_colors { code } else { "" };

    let title = style("\x1b[1;33m"); // Bold Yellow
    let hl = style("\x1b[1;36m"); // Bold Cyan
    let hi = style("\x1b[1m"); // Bold
    let cmd = style("\x1b[36m"); // Cyan
    let group = style("\x1b[1;32m"); // Bold Green
    let err = style("\x1b[91m"); // Bright Red
    let dim = style("\x1b[2m");
    let reset = style("\x1b[0m");

    let formatted_string = t!("cli.help.template")
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<hi>", hi)
        .replace("</hi>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<err>", err)
        .replace("</err>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    // clap wants a 'static template; this runs once per process.
    Box::leak(formatted_string.into_boxed_str())
}

/// hubcmd: AWS Security Hub operations as typed shell commands.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    disable_help_subcommand = true,
    trailing_var_arg = true
)]
pub struct Cli {
    /// Region to call. Overrides the settings file and HUBCMD_REGION.
    #[arg(long)]
    pub region: Option<String>,

    /// Endpoint override, e.g. a local emulator.
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Warn instead of failing when required parameters are missing.
    #[arg(long)]
    pub legacy: bool,

    /// Settings file to use instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,

    /// `<verb> <noun> [parameters...]`, `list` or `help <verb> <noun>`.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}
