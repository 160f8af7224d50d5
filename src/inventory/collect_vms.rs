use crate::error::Result;
use crate::inventory::backend::ManagementBackend;
use crate::inventory::types::{HostHandle, PropertyValue, VmRecord};

pub const CLUSTER_NAME_KEY: &str = "ClusterName";
pub const HOST_KEY: &str = "Host";

/// Enumerate the VMs of one host, tagging each with its owner.
pub fn collect_vm_records(
    backend: &dyn ManagementBackend,
    host: &HostHandle,
    cluster_name: &str,
) -> Result<Vec<VmRecord>> {
    let vms = backend.list_vms(host)?;
    log::debug!("{} VM(s) on {}", vms.len(), host.name);

    Ok(vms
        .into_iter()
        .map(|mut record| {
            record.insert(CLUSTER_NAME_KEY.to_string(), PropertyValue::from(cluster_name));
            record.insert(HOST_KEY.to_string(), PropertyValue::from(host.name.as_str()));
            record
        })
        .collect())
}
