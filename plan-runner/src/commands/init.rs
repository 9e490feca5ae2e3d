use anyhow::Result;
use plan_core::{config::Config, exit, write_plan_template, FilePlanner, Planner};

use crate::{args::InitArgs, GREEN_TICK};

pub fn init(config: &Config, args: &InitArgs) -> Result<()> {
    let planner = FilePlanner::new(&config.plan.file);
    if planner.plan_exists() && !args.overwrite {
        exit!(
            "Refusing to overwrite plan file",
            "Plan file {} already exists, pass --overwrite to replace it",
            config.plan.file
        );
    }

    if let Err(err) = write_plan_template(&config.template.0, &planner) {
        exit!(err, "Could not generate plan file {}", config.plan.file);
    }

    println!(
        "{} Generated installation plan file at {}",
        GREEN_TICK.to_string(),
        config.plan.file
    );
    Ok(())
}
