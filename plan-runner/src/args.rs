use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "plan-runner")]
#[command(
    author,
    version,
    about = "Generate and normalize Kubernetes cluster plan files",
    long_about = None
)]
pub struct Cli {
    /// Verbose logging
    #[arg(long, short, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Configuration file
    #[arg(long, short, default_value = "plan.toml")]
    pub file: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new plan file from the template options
    Init(InitArgs),
    /// Read the plan file, upgrade deprecated fields and write it back
    Normalize,
    /// Print addresses derived from the plan
    Info,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Replace an existing plan file
    #[arg(long, action = ArgAction::SetTrue)]
    pub overwrite: bool,
}
