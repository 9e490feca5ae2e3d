//! Rewrites fields from older plan schemas into their current location.
//!
//! A deprecated field that is present always wins over the field that
//! replaced it, so a plan written for an older release keeps behaving the
//! same way. Every deprecated field is drained whether or not its rule fires.

use tracing::info;

use crate::model::{Dashboard, Plan};

/// Provider assumed by plans that predate the `add_ons.package_manager.provider`
/// field, and the provider new templates start with.
pub const LEGACY_PACKAGE_MANAGER_PROVIDER: &str = "helm";

pub struct MigrationRule {
    pub name: &'static str,
    apply: fn(&mut Plan) -> bool,
}

impl MigrationRule {
    /// Returns true if the rule changed the plan.
    pub fn apply(&self, plan: &mut Plan) -> bool {
        (self.apply)(plan)
    }
}

/// Applied in this order.
pub const MIGRATION_RULES: &[MigrationRule] = &[
    MigrationRule {
        name: "features.package_manager",
        apply: package_manager_feature,
    },
    MigrationRule {
        name: "cluster.allow_package_installation",
        apply: allow_package_installation,
    },
    MigrationRule {
        name: "add_ons.dashbard",
        apply: misspelled_dashboard,
    },
    MigrationRule {
        name: "docker_registry.address",
        apply: registry_address,
    },
];

fn package_manager_feature(plan: &mut Plan) -> bool {
    let Some(legacy) = plan.features.take().and_then(|f| f.package_manager) else {
        return false;
    };
    plan.add_ons.package_manager.disable = !legacy.enabled;
    plan.add_ons.package_manager.provider = LEGACY_PACKAGE_MANAGER_PROVIDER.to_owned();
    true
}

fn allow_package_installation(plan: &mut Plan) -> bool {
    let Some(allow) = plan.cluster.allow_package_installation.take() else {
        return false;
    };
    plan.cluster.disable_package_installation = !allow;
    true
}

// Unlike the other rules this one yields to the current field.
fn misspelled_dashboard(plan: &mut Plan) -> bool {
    match plan.add_ons.dashboard_deprecated.take() {
        Some(legacy) if plan.add_ons.dashboard.is_none() => {
            plan.add_ons.dashboard = Some(Dashboard {
                disable: legacy.disable,
            });
            true
        }
        _ => false,
    }
}

fn registry_address(plan: &mut Plan) -> bool {
    let registry = &mut plan.docker_registry;
    let address = registry.address.take();
    let port = registry.port.take();
    match (address, port) {
        (Some(address), Some(port))
            if registry.server.is_empty() && !address.is_empty() && port != 0 =>
        {
            registry.server = format!("{address}:{port}");
            true
        }
        _ => false,
    }
}

/// Runs every rule against the plan and returns the names of the rules that fired.
pub fn migrate(plan: &mut Plan) -> Vec<&'static str> {
    let mut fired = Vec::new();
    for rule in MIGRATION_RULES {
        if rule.apply(plan) {
            info!("migrated deprecated plan field {}", rule.name);
            fired.push(rule.name);
        }
    }
    fired
}
