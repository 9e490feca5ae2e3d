use std::env;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use console::{style, StyledObject};
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

lazy_static::lazy_static! {
    static ref GREEN_TICK: StyledObject<&'static str> = style("✔").green();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "info" } else { "error" };
    let filter = match env::var("LOG") {
        Ok(f) => EnvFilter::new(f),
        Err(_) => EnvFilter::new(default_level),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = plan_core::config::parse_config_or_default(&args.file)?;
    match &args.command {
        Commands::Init(init) => commands::init::init(&config, init)?,
        Commands::Normalize => commands::normalize::normalize(&config)?,
        Commands::Info => commands::info::info(&config)?,
    }
    Ok(())
}
