use tracing::debug;

use crate::model::{Cni, Dashboard, HeapsterMonitoring, Plan};

pub const CNI_PROVIDER_CALICO: &str = "calico";
pub const DEFAULT_CALICO_MODE: &str = "overlay";
pub const DEFAULT_CALICO_LOG_LEVEL: &str = "info";
pub const DEFAULT_WORKLOAD_MTU: u32 = 1500;
pub const DEFAULT_FELIX_INPUT_MTU: u32 = 1440;
pub const DEFAULT_DNS_PROVIDER: &str = "kubedns";
pub const DEFAULT_HEAPSTER_REPLICAS: u32 = 2;
pub const DEFAULT_HEAPSTER_SINK: &str = "influxdb:http://heapster-influxdb.kube-system.svc:8086";
pub const DEFAULT_HEAPSTER_SERVICE_TYPE: &str = "ClusterIP";
/// Two years, in hours.
pub const DEFAULT_CA_EXPIRY: &str = "17520h";
pub const DEFAULT_CERT_EXPIRY: &str = "17520h";

fn fill(field: &mut String, value: &str, path: &str) {
    if field.is_empty() {
        debug!("defaulting {path} to {value}");
        *field = value.to_owned();
    }
}

fn fill_number(field: &mut u32, value: u32, path: &str) {
    if *field == 0 {
        debug!("defaulting {path} to {value}");
        *field = value;
    }
}

/// Fills every unset optional field. Must run after [`crate::migrate::migrate`]
/// so migrated values count as set.
pub fn apply_defaults(plan: &mut Plan) {
    // Plans from before CNI providers were configurable kept the calico mode
    // under cluster.networking.type.
    let legacy_mode = plan.cluster.networking.legacy_type.take();
    let cni = plan.add_ons.cni.get_or_insert_with(|| {
        let mut cni = Cni {
            provider: CNI_PROVIDER_CALICO.to_owned(),
            ..Default::default()
        };
        cni.options.calico.mode = match legacy_mode.filter(|m| !m.is_empty()) {
            Some(mode) => mode,
            None => DEFAULT_CALICO_MODE.to_owned(),
        };
        cni
    });
    let calico = &mut cni.options.calico;
    fill(
        &mut calico.log_level,
        DEFAULT_CALICO_LOG_LEVEL,
        "add_ons.cni.options.calico.log_level",
    );
    fill_number(
        &mut calico.workload_mtu,
        DEFAULT_WORKLOAD_MTU,
        "add_ons.cni.options.calico.workload_mtu",
    );
    fill_number(
        &mut calico.felix_input_mtu,
        DEFAULT_FELIX_INPUT_MTU,
        "add_ons.cni.options.calico.felix_input_mtu",
    );

    fill(
        &mut plan.add_ons.dns.provider,
        DEFAULT_DNS_PROVIDER,
        "add_ons.dns.provider",
    );

    let options = &mut plan
        .add_ons
        .heapster_monitoring
        .get_or_insert_with(HeapsterMonitoring::default)
        .options;
    fill_number(
        &mut options.heapster.replicas,
        DEFAULT_HEAPSTER_REPLICAS,
        "add_ons.heapster.options.heapster.replicas",
    );
    if let Some(replicas) = options.heapster_replicas.take().filter(|r| *r != 0) {
        options.heapster.replicas = replicas;
    }
    fill(
        &mut options.heapster.sink,
        DEFAULT_HEAPSTER_SINK,
        "add_ons.heapster.options.heapster.sink",
    );
    fill(
        &mut options.heapster.service_type,
        DEFAULT_HEAPSTER_SERVICE_TYPE,
        "add_ons.heapster.options.heapster.service_type",
    );
    if let Some(pvc) = options.influxdb_pvc_name.take().filter(|p| !p.is_empty()) {
        options.influxdb.pvc_name = pvc;
    }

    fill(
        &mut plan.cluster.certificates.ca_expiry,
        DEFAULT_CA_EXPIRY,
        "cluster.certificates.ca_expiry",
    );

    plan.add_ons.dashboard.get_or_insert_with(Dashboard::default);
}
