//! In-memory model of a cluster plan file.
//!
//! Every struct deserializes with `#[serde(default)]` so hand-edited plans may
//! omit any key. Fields that older plan files used and that have since moved
//! are kept as `Option`s marked deprecated; they are only ever read by
//! [`crate::migrate`] and [`crate::defaults`], which drain them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Plan {
    pub cluster: Cluster,
    pub docker: Docker,
    pub docker_registry: DockerRegistry,
    pub add_ons: AddOns,
    /// Deprecated: `features.package_manager` moved to `add_ons.package_manager`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,
    pub etcd: NodeGroup,
    pub master: MasterNodeGroup,
    pub worker: NodeGroup,
    pub ingress: NodeGroup,
    pub storage: NodeGroup,
    pub nfs: Nfs,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Cluster {
    pub name: String,
    pub admin_password: String,
    /// Deprecated: inverted and renamed to `disable_package_installation`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_package_installation: Option<bool>,
    pub disable_package_installation: bool,
    pub disconnected_installation: bool,
    pub networking: Networking,
    pub certificates: Certificates,
    pub ssh: Ssh,
    pub kube_apiserver: ApiServerOptions,
    pub cloud_provider: CloudProvider,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Networking {
    /// Deprecated: the calico mode before CNI providers were configurable.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub legacy_type: Option<String>,
    pub pod_cidr_block: String,
    pub service_cidr_block: String,
    pub update_hosts_files: bool,
    pub http_proxy: String,
    pub https_proxy: String,
    pub no_proxy: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Certificates {
    pub expiry: String,
    pub ca_expiry: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Ssh {
    pub user: String,
    pub ssh_key: String,
    pub ssh_port: u16,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ApiServerOptions {
    pub option_overrides: BTreeMap<String, String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CloudProvider {
    pub provider: String,
    pub config: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Docker {
    pub disable: bool,
    pub logs: DockerLogs,
    pub storage: DockerStorage,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DockerLogs {
    pub driver: String,
    pub opts: BTreeMap<String, String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DockerStorage {
    pub direct_lvm: DirectLvm,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DirectLvm {
    pub enabled: bool,
    pub block_device: String,
    pub enable_deferred_deletion: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DockerRegistry {
    pub server: String,
    #[serde(rename = "CA")]
    pub ca: String,
    pub username: String,
    pub password: String,
    /// Deprecated: combined with `port` into `server`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Deprecated: combined with `address` into `server`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AddOns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cni: Option<Cni>,
    pub dns: Dns,
    #[serde(rename = "heapster", skip_serializing_if = "Option::is_none")]
    pub heapster_monitoring: Option<HeapsterMonitoring>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<Dashboard>,
    /// Deprecated: older plan files carried the dashboard block under this
    /// misspelled key.
    #[serde(rename = "dashbard", skip_serializing_if = "Option::is_none")]
    pub dashboard_deprecated: Option<Dashboard>,
    pub package_manager: PackageManager,
    pub rescheduler: Rescheduler,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Cni {
    pub disable: bool,
    pub provider: String,
    pub options: CniOptions,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CniOptions {
    pub calico: CalicoOptions,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CalicoOptions {
    pub mode: String,
    pub log_level: String,
    /// Zero means unset.
    pub workload_mtu: u32,
    /// Zero means unset.
    pub felix_input_mtu: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Dns {
    pub disable: bool,
    pub provider: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HeapsterMonitoring {
    pub disable: bool,
    pub options: HeapsterOptions,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HeapsterOptions {
    pub heapster: Heapster,
    pub influxdb: InfluxDb,
    /// Deprecated: flat form of `heapster.replicas`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heapster_replicas: Option<u32>,
    /// Deprecated: flat form of `influxdb.pvc_name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influxdb_pvc_name: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Heapster {
    /// Zero means unset.
    pub replicas: u32,
    pub service_type: String,
    pub sink: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct InfluxDb {
    pub pvc_name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Dashboard {
    pub disable: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PackageManager {
    pub disable: bool,
    pub provider: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Rescheduler {
    pub disable: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Features {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<DeprecatedPackageManager>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DeprecatedPackageManager {
    pub enabled: bool,
}

/// The node list is authoritative; `expected_count` only records how many
/// nodes the plan was generated for.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct NodeGroup {
    pub expected_count: usize,
    pub nodes: Vec<Node>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MasterNodeGroup {
    pub expected_count: usize,
    pub nodes: Vec<Node>,
    pub load_balanced_fqdn: String,
    pub load_balanced_short_name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Node {
    pub host: String,
    pub ip: String,
    pub internalip: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Nfs {
    pub nfs_volume: Vec<NfsVolume>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct NfsVolume {
    pub nfs_host: String,
    pub mount_path: String,
}

impl Plan {
    /// True when a CNI provider will be installed, which is what pod
    /// networking (and anything smoke-testing it) depends on.
    pub fn network_configured(&self) -> bool {
        matches!(&self.add_ons.cni, Some(cni) if !cni.disable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_deserialize_to_defaults() {
        let plan: Plan = serde_yaml::from_str("cluster:\n  name: kubernetes\n").unwrap();
        assert_eq!(plan.cluster.name, "kubernetes");
        assert!(plan.add_ons.cni.is_none());
        assert!(plan.etcd.nodes.is_empty());
    }

    #[test]
    fn deprecated_keys_are_read_but_not_written_when_absent() {
        let plan: Plan = serde_yaml::from_str(concat!(
            "features:\n  package_manager:\n    enabled: true\n",
            "add_ons:\n  dashbard:\n    disable: true\n",
        ))
        .unwrap();
        assert_eq!(
            plan.features,
            Some(Features {
                package_manager: Some(DeprecatedPackageManager { enabled: true })
            })
        );
        assert_eq!(plan.add_ons.dashboard_deprecated, Some(Dashboard { disable: true }));

        let out = serde_yaml::to_string(&Plan::default()).unwrap();
        assert!(!out.contains("features"));
        assert!(!out.contains("dashbard"));
        assert!(!out.contains("allow_package_installation"));
    }

    #[test]
    fn network_configured_requires_enabled_cni() {
        let mut plan = Plan::default();
        assert!(!plan.network_configured());

        plan.add_ons.cni = Some(Cni::default());
        assert!(plan.network_configured());

        plan.add_ons.cni.as_mut().unwrap().disable = true;
        assert!(!plan.network_configured());
    }
}
