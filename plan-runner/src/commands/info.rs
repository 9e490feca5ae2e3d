use anyhow::Result;
use plan_core::{config::Config, exit, FilePlanner, PlanReadWriter};

pub fn info(config: &Config) -> Result<()> {
    let planner = FilePlanner::new(&config.plan.file);
    let plan = match planner.read() {
        Ok(p) => p,
        Err(err) => exit!(err, "Could not read plan file {}", config.plan.file),
    };

    println!("cluster:             {}", plan.cluster.name);
    println!("etcd nodes:          {}", plan.etcd.nodes.len());
    println!("master nodes:        {}", plan.master.nodes.len());
    println!("worker nodes:        {}", plan.worker.nodes.len());
    println!("ingress nodes:       {}", plan.ingress.nodes.len());
    println!("storage nodes:       {}", plan.storage.nodes.len());
    println!("network configured:  {}", plan.network_configured());
    println!("kubernetes service:  {}", plan.kubernetes_service_ip()?);
    println!("dns service:         {}", plan.dns_service_ip()?);
    Ok(())
}
