//! Documentation written above plan fields when a plan file is saved.
//!
//! Keys are the dotted path of a field from the document root. Keys of
//! fields inside list items skip the list itself, so the host of an NFS
//! volume is `nfs.nfs_volume.nfs_host`.

use std::collections::HashMap;

pub type CommentLines = &'static [&'static str];

pub const PLAN_COMMENTS: &[(&str, CommentLines)] = &[
    ("cluster.admin_password", &[
        "This password is used to login to the Kubernetes Dashboard and can also be",
        "used for administration without a security certificate.",
    ]),
    ("cluster.disable_package_installation", &[
        "Set to true if the nodes have the required packages installed.",
    ]),
    ("cluster.disconnected_installation", &[
        "Set to true if you are performing a disconnected installation.",
    ]),
    ("cluster.networking", &["Networking configuration of your cluster."]),
    ("cluster.networking.pod_cidr_block", &[
        "Kubernetes will assign pods IPs in this range. Do not use a range that is",
        "already in use on your local network!",
    ]),
    ("cluster.networking.service_cidr_block", &[
        "Kubernetes will assign services IPs in this range. Do not use a range",
        "that is already in use by your local network or pod network!",
    ]),
    ("cluster.networking.update_hosts_files", &[
        "Set to true if your nodes cannot resolve each others' names using DNS.",
    ]),
    ("cluster.networking.http_proxy", &["Set the proxy server to use for HTTP connections."]),
    ("cluster.networking.https_proxy", &["Set the proxy server to use for HTTPs connections."]),
    ("cluster.networking.no_proxy", &[
        "List of host names and/or IPs that shouldn't go through any proxy.",
        "All nodes' 'host' and 'IPs' are always set.",
    ]),
    ("cluster.certificates", &["Generated certs configuration."]),
    ("cluster.certificates.expiry", &[
        "Self-signed certificate expiration period in hours; default is 2 years.",
    ]),
    ("cluster.certificates.ca_expiry", &[
        "CA certificate expiration period in hours; default is 2 years.",
    ]),
    ("cluster.ssh", &["SSH configuration for cluster nodes."]),
    ("cluster.ssh.user", &["This user must be able to sudo without password."]),
    ("cluster.ssh.ssh_key", &[
        "Absolute path to the ssh private key we should use to manage nodes.",
    ]),
    ("cluster.kube_apiserver", &["Override configuration of Kubernetes components."]),
    ("cluster.cloud_provider", &["Kubernetes cloud provider integration"]),
    ("cluster.cloud_provider.provider", &[
        "Options: 'aws','azure','cloudstack','fake','gce','mesos','openstack',",
        "'ovirt','photon','rackspace','vsphere'.",
        "Leave empty for bare metal setups or other unsupported providers.",
    ]),
    ("cluster.cloud_provider.config", &[
        "Path to the config file, leave empty if provider does not require it.",
    ]),
    ("docker", &["Docker daemon configuration of all cluster nodes"]),
    ("docker.storage.direct_lvm", &[
        "Configure devicemapper in direct-lvm mode (RHEL/CentOS only).",
    ]),
    ("docker.storage.direct_lvm.block_device", &[
        "Path to the block device that will be used for direct-lvm mode. This",
        "device will be wiped and used exclusively by docker.",
    ]),
    ("docker.storage.direct_lvm.enable_deferred_deletion", &[
        "Set to true if you want to enable deferred deletion when using",
        "direct-lvm mode.",
    ]),
    ("docker_registry", &[
        "If you want to use an internal registry for the installation or upgrade, you",
        "must provide its information here. You must seed this registry before the",
        "installation or upgrade of your cluster. This registry must be accessible from",
        "all nodes on the cluster.",
    ]),
    ("docker_registry.server", &["IP or hostname and port for your registry."]),
    ("docker_registry.CA", &[
        "Absolute path to the certificate authority that should be trusted when",
        "connecting to your registry.",
    ]),
    ("docker_registry.username", &["Leave blank for unauthenticated access."]),
    ("docker_registry.password", &["Leave blank for unauthenticated access."]),
    ("add_ons", &["Add-ons are additional components that KET installs on the cluster."]),
    ("add_ons.cni.provider", &[
        "Selecting 'custom' will result in a CNI ready cluster, however it is up to",
        "you to configure a plugin after the install.",
        "Options: 'calico','weave','contiv','custom'.",
    ]),
    ("add_ons.cni.options.calico.mode", &["Options: 'overlay','routed'."]),
    ("add_ons.cni.options.calico.log_level", &["Options: 'warning','info','debug'."]),
    ("add_ons.cni.options.calico.workload_mtu", &[
        "MTU for the workload interface, configures the CNI config.",
    ]),
    ("add_ons.cni.options.calico.felix_input_mtu", &[
        "MTU for the tunnel device used if IPIP is enabled.",
    ]),
    ("add_ons.dns.provider", &["Options: 'kubedns','coredns'."]),
    ("add_ons.heapster.options.heapster.service_type", &[
        "Specify kubernetes ServiceType. Defaults to 'ClusterIP'.",
        "Options: 'ClusterIP','NodePort','LoadBalancer','ExternalName'.",
    ]),
    ("add_ons.heapster.options.heapster.sink", &[
        "Specify the sink to store heapster data. Defaults to an influxdb pod",
        "running on the cluster.",
    ]),
    ("add_ons.heapster.options.influxdb.pvc_name", &[
        "Provide the name of the persistent volume claim that you will create",
        "after installation. If not specified, the data will be stored in",
        "ephemeral storage.",
    ]),
    ("add_ons.package_manager.provider", &["Options: 'helm'"]),
    ("add_ons.rescheduler", &[
        "The rescheduler ensures that critical add-ons remain running on the cluster.",
    ]),
    ("etcd", &["Etcd nodes are the ones that run the etcd distributed key-value database."]),
    ("etcd.nodes", &[
        "Provide the hostname and IP of each node. If the node has an IP for internal",
        "traffic, provide it in the internalip field. Otherwise, that field can be",
        "left blank.",
    ]),
    ("master", &["Master nodes are the ones that run the Kubernetes control plane components."]),
    ("master.load_balanced_fqdn", &[
        "If you have set up load balancing for master nodes, enter the FQDN name here.",
        "Otherwise, use the IP address of a single master node.",
    ]),
    ("master.load_balanced_short_name", &[
        "If you have set up load balancing for master nodes, enter the short name here.",
        "Otherwise, use the IP address of a single master node.",
    ]),
    ("worker", &["Worker nodes are the ones that will run your workloads on the cluster."]),
    ("ingress", &["Ingress nodes will run the ingress controllers."]),
    ("storage", &[
        "Storage nodes will be used to create a distributed storage cluster that can",
        "be consumed by your workloads.",
    ]),
    ("nfs", &["A set of NFS volumes for use by on-cluster persistent workloads"]),
    ("nfs.nfs_volume.nfs_host", &["The host name or ip address of an NFS server."]),
    ("nfs.nfs_volume.mount_path", &["The mount path of an NFS share. Must start with /"]),
];

lazy_static::lazy_static! {
    static ref REGISTRY: HashMap<&'static str, CommentLines> =
        PLAN_COMMENTS.iter().copied().collect();
}

/// A per-write copy of the registry. Paths are removed once they have been
/// annotated so each path is documented at most once per file.
pub type WorkingCopy = HashMap<&'static str, CommentLines>;

pub fn working_copy() -> WorkingCopy {
    REGISTRY.clone()
}

pub fn lookup(path: &str) -> Option<CommentLines> {
    REGISTRY.get(path).copied()
}
