//! GraphQL catalog of movies and people, stored in MongoDB.

use clap::{FromArgMatches, CommandFactory};
use std::env;

use crate::{
    args::{Args, Command},
    config::Config,
    prelude::*,
};

mod api;
mod args;
mod catalog;
mod cmd;
mod config;
mod db;
mod logger;
mod model;
mod prelude;
mod store;
mod version;


#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Log error in case stdout is not connected and it is logged into a file.
        error!("{:?}", e);

        // Show a somewhat nice representation of the error
        eprintln!();
        eprintln!();
        bunt::eprintln!("{$red}▶▶▶ {$bold}Error:{/$}{/$} {[yellow+intense]}", e);
        eprintln!();
        if e.chain().len() > 1 {
            bunt::eprintln!("{$red+italic}Caused by:{/$}");
        }

        for (i, cause) in e.chain().skip(1).enumerate() {
            eprint!(" {: >1$}", "", i * 2);
            eprintln!("‣ {cause}");
        }

        std::process::exit(1);
    }
}

/// Main entry point.
async fn run() -> Result<()> {
    // Backtraces are almost always useful and we don't expect errors to be
    // frequent enough for their cost to matter.
    if env::var("RUST_BACKTRACE") == Err(env::VarError::NotPresent) {
        env::set_var("RUST_BACKTRACE", "1");
    }

    // Parse CLI args. This is a bit roundabout because the version string is
    // built at runtime.
    let args = Args::from_arg_matches(
        &Args::command()
            .version(version::full())
            .get_matches(),
    )?;

    // Configure output via `bunt`
    bunt::set_stdout_color_choice(args.stdout_color());
    bunt::set_stderr_color_choice(args.stderr_color());


    // Dispatch subcommand.
    match &args.cmd {
        Command::Exec { args: exec_args, shared } => {
            let config = load_config_and_init_logger(shared, &args)?;
            cmd::exec::run(exec_args, config).await?;
        }
        Command::Check { shared } => cmd::check::run(shared, &args).await?,
        Command::WriteConfig { target } => config::write_template(target.as_ref())?,
        Command::ExportApiSchema { args } => cmd::export_api_schema::run(args)?,
    }

    Ok(())
}

fn load_config_and_init_logger(shared: &args::Shared, args: &Args) -> Result<Config> {
    // Load configuration.
    let (config, path) = match &shared.config {
        Some(path) => {
            let config = Config::load_from(path)
                .context(format!("failed to load config from '{}'", path.display()))?;
            (config, Some(path.clone()))
        }
        None => Config::from_env_or_default_locations()?,
    };

    // Initialize logger. Unfortunately, we can only do this here
    // after reading the config.
    logger::init(&config.log, args.color, args.cmd.name())?;
    match path {
        Some(path) => info!("Loaded config from '{}'", path.display()),
        None => info!("No config file found: using defaults and environment variables"),
    }
    trace!("Configuration: {config:#?}");

    Ok(config)
}
