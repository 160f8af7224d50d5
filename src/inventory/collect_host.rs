use crate::error::Result;
use crate::inventory::backend::ManagementBackend;
use crate::inventory::reflect::prefixed;
use crate::inventory::types::{HostHandle, HostRecord};

pub const HYPERV_PREFIX: &str = "HyperV_";
pub const OS_PREFIX: &str = "OS_";
pub const SYSTEM_PREFIX: &str = "System_";

/// Merge OS, machine and Hyper-V host configuration into one flat record.
pub fn collect_host_record(backend: &dyn ManagementBackend, host: &HostHandle) -> Result<HostRecord> {
    let os = backend.os_info(host)?;
    let system = backend.system_info(host)?;
    let hyperv = backend.host_config(host)?;

    let mut record = HostRecord::new();
    record.extend(prefixed(hyperv, HYPERV_PREFIX));
    record.extend(prefixed(os, OS_PREFIX));
    record.extend(prefixed(system, SYSTEM_PREFIX));
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::backend::fake::FakeBackend;
    use crate::inventory::types::PropertyValue;

    #[test]
    fn test_host_record_namespaces() {
        let backend = FakeBackend::local("HV01", &[]);
        let record = collect_host_record(&backend, &HostHandle::new("HV01")).unwrap();

        assert_eq!(record["System_Name"], PropertyValue::from("HV01"));
        assert_eq!(record["OS_BuildNumber"], PropertyValue::from("20348"));
        assert_eq!(record["HyperV_NumaSpanningEnabled"], PropertyValue::Bool(true));
        assert!(record.keys().all(|k| {
            k.starts_with(HYPERV_PREFIX) || k.starts_with(OS_PREFIX) || k.starts_with(SYSTEM_PREFIX)
        }));
        // 3 + 3 + 4 source properties, none lost to collisions
        assert_eq!(record.len(), 10);
    }

    #[test]
    fn test_unreachable_host_fails() {
        let mut backend = FakeBackend::local("HV01", &[]);
        backend.unreachable.insert("HV01".to_string());
        assert!(collect_host_record(&backend, &HostHandle::new("HV01")).is_err());
    }
}
