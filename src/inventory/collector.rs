use chrono::Local;

use crate::error::{ReportError, Result};
use crate::inventory::backend::ManagementBackend;
use crate::inventory::collect_host::collect_host_record;
use crate::inventory::collect_vms::collect_vm_records;
use crate::inventory::types::{
    HostHandle, HostRecord, Inventory, SkippedHost, Topology, VmRecord, LOCAL_NODE,
};
use crate::output::print_warning;

/// Walk the discovered topology and gather cluster, host and VM records.
///
/// A host that cannot be queried is skipped with a warning and listed in
/// `Inventory::skipped`, unless `strict` is set, in which case the first
/// failure aborts the run.
pub fn collect_full_inventory(
    backend: &dyn ManagementBackend,
    topology: &Topology,
    strict: bool,
) -> Result<Inventory> {
    let started_at = Local::now();
    let mut inventory = Inventory {
        started_at,
        mode: topology.mode,
        clusters: Vec::new(),
        hosts: Vec::new(),
        vms: Vec::new(),
        skipped: Vec::new(),
    };

    for scope in &topology.clusters {
        inventory.clusters.push(scope.cluster.properties.clone());
        if let Some(reason) = &scope.node_error {
            let host = format!("{} (node listing)", scope.cluster.name);
            if strict {
                return Err(ReportError::HostFailed {
                    host,
                    source: Box::new(ReportError::Query {
                        command: "Get-ClusterNode".to_string(),
                        message: reason.clone(),
                    }),
                });
            }
            inventory.skipped.push(SkippedHost {
                host,
                reason: reason.clone(),
            });
        }
        for node in &scope.nodes {
            visit_host(backend, node, &scope.cluster.name, strict, &mut inventory)?;
        }
    }

    if let Some(local) = &topology.local {
        visit_host(backend, local, LOCAL_NODE, strict, &mut inventory)?;
    }

    Ok(inventory)
}

fn visit_host(
    backend: &dyn ManagementBackend,
    host: &HostHandle,
    cluster_name: &str,
    strict: bool,
    inventory: &mut Inventory,
) -> Result<()> {
    log::info!("collecting {} ({})", host.name, cluster_name);

    match collect_host(backend, host, cluster_name) {
        Ok((record, vms)) => {
            inventory.hosts.push(record);
            inventory.vms.extend(vms);
            Ok(())
        }
        Err(e) if strict => Err(ReportError::HostFailed {
            host: host.name.clone(),
            source: Box::new(e),
        }),
        Err(e) => {
            print_warning(&format!("Skipping host '{}': {}", host.name, e));
            inventory.skipped.push(SkippedHost {
                host: host.name.clone(),
                reason: e.to_string(),
            });
            Ok(())
        }
    }
}

fn collect_host(
    backend: &dyn ManagementBackend,
    host: &HostHandle,
    cluster_name: &str,
) -> Result<(HostRecord, Vec<VmRecord>)> {
    let record = collect_host_record(backend, host)?;
    let vms = collect_vm_records(backend, host, cluster_name)?;
    Ok((record, vms))
}
