use anyhow::Result;
use plan_core::{config::Config, exit, FilePlanner, PlanReadWriter, Planner};

use crate::GREEN_TICK;

pub fn normalize(config: &Config) -> Result<()> {
    let planner = FilePlanner::new(&config.plan.file);
    if !planner.plan_exists() {
        exit!(
            "Plan file not found",
            "Plan file {} does not exist, run init first",
            config.plan.file
        );
    }

    let plan = match planner.read() {
        Ok(p) => p,
        Err(err) => exit!(err, "Could not read plan file {}", config.plan.file),
    };
    if let Err(err) = planner.write(&plan) {
        exit!(err, "Could not write plan file {}", config.plan.file);
    }

    println!(
        "{} Normalized plan file {}",
        GREEN_TICK.to_string(),
        config.plan.file
    );
    Ok(())
}
