use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    defaults::*,
    error::PlanError,
    migrate::LEGACY_PACKAGE_MANAGER_PROVIDER,
    model::{Cni, Dashboard, HeapsterMonitoring, Node, NfsVolume, Plan},
    password::{generate_alphanumeric_password, PasswordGenerator, RandomPasswordGenerator},
};

pub const DEFAULT_CLUSTER_NAME: &str = "kubernetes";
pub const DEFAULT_SSH_USER: &str = "kismaticuser";
pub const DEFAULT_SSH_KEY: &str = "kismaticuser.key";
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_POD_CIDR: &str = "172.16.0.0/16";
pub const DEFAULT_SERVICE_CIDR: &str = "172.20.0.0/16";
pub const DEFAULT_NFS_MOUNT_PATH: &str = "/";

/// Options for generating a new plan file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlanTemplateOptions {
    pub etcd_nodes: usize,
    pub master_nodes: usize,
    pub worker_nodes: usize,
    pub ingress_nodes: usize,
    pub storage_nodes: usize,
    pub nfs_volumes: usize,
    /// Generated when empty.
    pub admin_password: String,
}

pub fn build_plan(options: &PlanTemplateOptions) -> Result<Plan, PlanError> {
    build_plan_with(options, &mut RandomPasswordGenerator::new())
}

/// Builds a plan with every default filled in. The values match what
/// [`apply_defaults`] would produce so generated and loaded plans agree.
pub fn build_plan_with<G: PasswordGenerator + ?Sized>(
    options: &PlanTemplateOptions,
    generator: &mut G,
) -> Result<Plan, PlanError> {
    let admin_password = if options.admin_password.is_empty() {
        info!("no admin password given, generating one");
        generate_alphanumeric_password(generator)?
    } else {
        options.admin_password.clone()
    };

    let mut p = Plan::default();
    p.cluster.name = DEFAULT_CLUSTER_NAME.to_owned();
    p.cluster.admin_password = admin_password;
    p.cluster.disable_package_installation = false;
    p.cluster.disconnected_installation = false;

    p.cluster.ssh.user = DEFAULT_SSH_USER.to_owned();
    p.cluster.ssh.ssh_key = DEFAULT_SSH_KEY.to_owned();
    p.cluster.ssh.ssh_port = DEFAULT_SSH_PORT;

    p.cluster.networking.pod_cidr_block = DEFAULT_POD_CIDR.to_owned();
    p.cluster.networking.service_cidr_block = DEFAULT_SERVICE_CIDR.to_owned();
    p.cluster.networking.update_hosts_files = false;

    p.cluster.certificates.expiry = DEFAULT_CERT_EXPIRY.to_owned();
    p.cluster.certificates.ca_expiry = DEFAULT_CA_EXPIRY.to_owned();

    let mut cni = Cni {
        provider: CNI_PROVIDER_CALICO.to_owned(),
        ..Default::default()
    };
    cni.options.calico.mode = DEFAULT_CALICO_MODE.to_owned();
    cni.options.calico.log_level = DEFAULT_CALICO_LOG_LEVEL.to_owned();
    cni.options.calico.workload_mtu = DEFAULT_WORKLOAD_MTU;
    cni.options.calico.felix_input_mtu = DEFAULT_FELIX_INPUT_MTU;
    p.add_ons.cni = Some(cni);

    p.add_ons.dns.provider = DEFAULT_DNS_PROVIDER.to_owned();

    let mut heapster = HeapsterMonitoring::default();
    heapster.options.heapster.replicas = DEFAULT_HEAPSTER_REPLICAS;
    heapster.options.heapster.service_type = DEFAULT_HEAPSTER_SERVICE_TYPE.to_owned();
    heapster.options.heapster.sink = DEFAULT_HEAPSTER_SINK.to_owned();
    p.add_ons.heapster_monitoring = Some(heapster);

    p.add_ons.package_manager.provider = LEGACY_PACKAGE_MANAGER_PROVIDER.to_owned();
    p.add_ons.dashboard = Some(Dashboard { disable: false });

    p.etcd.expected_count = options.etcd_nodes;
    p.master.expected_count = options.master_nodes;
    p.worker.expected_count = options.worker_nodes;
    p.ingress.expected_count = options.ingress_nodes;
    p.storage.expected_count = options.storage_nodes;

    p.etcd.nodes = vec![Node::default(); options.etcd_nodes];
    p.master.nodes = vec![Node::default(); options.master_nodes];
    p.worker.nodes = vec![Node::default(); options.worker_nodes];
    p.ingress.nodes = vec![Node::default(); options.ingress_nodes];
    p.storage.nodes = vec![Node::default(); options.storage_nodes];

    p.nfs.nfs_volume = vec![
        NfsVolume {
            nfs_host: String::new(),
            mount_path: DEFAULT_NFS_MOUNT_PATH.to_owned(),
        };
        options.nfs_volumes
    ];

    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::PasswordRequirements;

    struct NeverAlphanumeric {
        calls: usize,
    }

    impl PasswordGenerator for NeverAlphanumeric {
        fn candidate(&mut self, _: &PasswordRequirements) -> Result<String, PlanError> {
            self.calls += 1;
            Ok("----------------".to_owned())
        }
    }

    #[test]
    fn given_password_is_kept() {
        let options = PlanTemplateOptions {
            admin_password: "hunter2hunter2".into(),
            ..Default::default()
        };
        let mut generator = NeverAlphanumeric { calls: 0 };
        let plan = build_plan_with(&options, &mut generator).unwrap();
        assert_eq!(plan.cluster.admin_password, "hunter2hunter2");
        assert_eq!(generator.calls, 0);
    }

    #[test]
    fn password_generation_failure_is_reported() {
        let mut generator = NeverAlphanumeric { calls: 0 };
        let err = build_plan_with(&PlanTemplateOptions::default(), &mut generator).unwrap_err();
        assert!(matches!(err, PlanError::PasswordExhausted { .. }));
        assert_eq!(generator.calls, 6);
    }

    #[test]
    fn template_has_no_deprecated_fields() {
        let plan = build_plan(&PlanTemplateOptions::default()).unwrap();
        assert!(plan.features.is_none());
        assert!(plan.cluster.allow_package_installation.is_none());
        assert!(plan.cluster.networking.legacy_type.is_none());
        assert!(plan.add_ons.dashboard_deprecated.is_none());
        assert!(plan.docker_registry.address.is_none());
        assert!(plan.docker_registry.port.is_none());
    }

    #[test]
    fn template_and_migration_agree_on_package_manager() {
        let mut legacy = Plan::default();
        legacy.features = Some(crate::model::Features {
            package_manager: Some(crate::model::DeprecatedPackageManager { enabled: true }),
        });
        crate::migrate::migrate(&mut legacy);

        let plan = build_plan(&PlanTemplateOptions::default()).unwrap();
        assert_eq!(plan.add_ons.package_manager, legacy.add_ons.package_manager);
        assert_eq!(plan.add_ons.package_manager.provider, "helm");
    }

    #[test]
    fn template_matches_documented_scenario() {
        let options = PlanTemplateOptions {
            etcd_nodes: 3,
            master_nodes: 1,
            worker_nodes: 2,
            ingress_nodes: 0,
            storage_nodes: 0,
            nfs_volumes: 1,
            admin_password: String::new(),
        };
        let plan = build_plan(&options).unwrap();

        assert_eq!(plan.etcd.nodes.len(), 3);
        assert_eq!(plan.master.nodes.len(), 1);
        assert_eq!(plan.worker.nodes.len(), 2);
        assert!(plan.ingress.nodes.is_empty());
        assert!(plan.storage.nodes.is_empty());
        assert_eq!(
            plan.nfs.nfs_volume,
            vec![NfsVolume {
                nfs_host: String::new(),
                mount_path: "/".into()
            }]
        );
        assert_eq!(plan.cluster.networking.pod_cidr_block, "172.16.0.0/16");
        assert_eq!(plan.cluster.networking.service_cidr_block, "172.20.0.0/16");
        assert_eq!(plan.cluster.certificates.ca_expiry, DEFAULT_CA_EXPIRY);

        let pw = &plan.cluster.admin_password;
        assert!(pw.len() >= 16);
        assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
