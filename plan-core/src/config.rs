use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{exit, template::PlanTemplateOptions};

pub const DEFAULT_PLAN_FILE: &str = "kismatic-cluster.yaml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub plan: PlanFile,
    pub template: Template,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlanFile {
    pub file: String,
}

impl Default for PlanFile {
    fn default() -> Self {
        Self {
            file: DEFAULT_PLAN_FILE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Template(pub PlanTemplateOptions);

impl Default for Template {
    fn default() -> Self {
        Self(PlanTemplateOptions {
            etcd_nodes: 3,
            master_nodes: 2,
            worker_nodes: 3,
            ingress_nodes: 2,
            storage_nodes: 0,
            nfs_volumes: 0,
            admin_password: String::new(),
        })
    }
}

pub fn parse_config_str(config: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(config)
}

pub fn parse_config(file: &str) -> Result<Config> {
    let config = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(err) => exit!(err, "Could not read config file {}", file),
    };

    let config = match parse_config_str(&config) {
        Ok(c) => c,
        Err(err) => exit!(err, "Could not parse config file {}", file),
    };

    info!("config file parsed");
    Ok(config)
}

/// Like [`parse_config`], but a missing file yields the default configuration.
pub fn parse_config_or_default(file: &str) -> Result<Config> {
    if !Path::new(file).exists() {
        info!("config file {file} not found, using defaults");
        return Ok(Config::default());
    }
    parse_config(file)
}
