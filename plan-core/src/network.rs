use std::net::Ipv4Addr;

use crate::{error::PlanError, model::Plan};

/// Returns the address `offset` hosts into an IPv4 CIDR block.
pub fn ip_from_cidr(cidr: &str, offset: u32) -> Result<Ipv4Addr, PlanError> {
    let (addr, prefix) = cidr
        .split_once('/')
        .ok_or_else(|| PlanError::invalid_cidr(cidr, "missing prefix length"))?;
    let addr: Ipv4Addr = addr
        .parse()
        .map_err(|e| PlanError::invalid_cidr(cidr, format!("{e}")))?;
    let prefix: u32 = prefix
        .parse()
        .ok()
        .filter(|p| *p <= 32)
        .ok_or_else(|| PlanError::invalid_cidr(cidr, "prefix length must be between 0 and 32"))?;

    let host_bits = 32 - prefix;
    let mask = u32::MAX.checked_shl(host_bits).unwrap_or(0);
    let size = 1u64 << host_bits;
    if u64::from(offset) >= size {
        return Err(PlanError::invalid_cidr(
            cidr,
            format!("offset {offset} is outside a block of {size} addresses"),
        ));
    }
    Ok(Ipv4Addr::from((u32::from(addr) & mask) + offset))
}

impl Plan {
    /// Address of the `kubernetes` service, the first host in the service range.
    pub fn kubernetes_service_ip(&self) -> Result<Ipv4Addr, PlanError> {
        ip_from_cidr(&self.cluster.networking.service_cidr_block, 1)
    }

    /// Address reserved for the cluster DNS service.
    pub fn dns_service_ip(&self) -> Result<Ipv4Addr, PlanError> {
        ip_from_cidr(&self.cluster.networking.service_cidr_block, 2)
    }
}
