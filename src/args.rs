//! This module defines the command line arguments we accept.

use std::{io::IsTerminal, path::PathBuf};
use termcolor::ColorChoice;

use crate::cmd;


#[derive(Debug, clap::Parser)]
#[command(about = "GraphQL catalog of movies and the people who made them.")]
pub(crate) struct Args {
    #[command(subcommand)]
    pub(crate) cmd: Command,

    /// Whether to use colors in the output: "auto", "always" or "never".
    #[arg(long, global = true, default_value = "auto", value_parser = parse_color_choice)]
    pub(crate) color: ColorChoice,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Command {
    /// Executes a GraphQL document against the configured store and prints
    /// the JSON response. Exits with 1 if the response contains errors.
    Exec {
        #[command(flatten)]
        args: cmd::exec::Args,

        #[command(flatten)]
        shared: Shared,
    },

    /// Checks config and store connection. Exits with 0 if everything is Ok,
    /// and with 1 otherwise.
    Check {
        #[command(flatten)]
        shared: Shared,
    },

    /// Outputs a template for the configuration file (which includes
    /// descriptions of all options).
    WriteConfig {
        /// Target file. If not specified, the template is written to stdout.
        target: Option<PathBuf>,
    },

    /// Exports the API as GraphQL schema.
    ExportApiSchema {
        #[command(flatten)]
        args: cmd::export_api_schema::Args,
    },
}

#[derive(Debug, clap::Args)]
pub(crate) struct Shared {
    /// Path to the configuration file. If this is not specified, we try
    /// `$FILMOGRAPHY_CONFIG_PATH`, `config.toml` and
    /// `/etc/filmography/config.toml`, in that order.
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
}

impl Command {
    /// Name used for `${cmd}` in the log file path.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Exec { .. } => "exec",
            Self::Check { .. } => "check",
            Self::WriteConfig { .. } | Self::ExportApiSchema { .. } => "other",
        }
    }
}

impl Args {
    pub(crate) fn stdout_color(&self) -> ColorChoice {
        resolve_color(self.color, std::io::stdout().is_terminal())
    }

    pub(crate) fn stderr_color(&self) -> ColorChoice {
        resolve_color(self.color, std::io::stderr().is_terminal())
    }
}

fn resolve_color(choice: ColorChoice, is_terminal: bool) -> ColorChoice {
    match choice {
        ColorChoice::Auto if !is_terminal => ColorChoice::Never,
        other => other,
    }
}

fn parse_color_choice(s: &str) -> Result<ColorChoice, String> {
    match s {
        "auto" => Ok(ColorChoice::Auto),
        "always" => Ok(ColorChoice::Always),
        "never" => Ok(ColorChoice::Never),
        other => Err(format!("invalid color choice '{other}', expected auto, always or never")),
    }
}
