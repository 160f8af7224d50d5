//! Management queries against the cluster, Hyper-V and CIM services.
//!
//! Every query is a one-shot PowerShell pipeline ending in
//! `ConvertTo-Json -Compress`, parsed back into property bags.

use std::process::Command;

use sysinfo::System;

use crate::error::{ReportError, Result};
use crate::inventory::reflect::parse_objects;
use crate::inventory::types::{ClusterHandle, HostHandle, PropertyBag, PropertyValue};

#[cfg(target_os = "windows")]
pub const DEFAULT_POWERSHELL: &str = r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe";
#[cfg(not(target_os = "windows"))]
pub const DEFAULT_POWERSHELL: &str = "pwsh";

/// The property-bag producers the collectors depend on.
pub trait ManagementBackend {
    fn is_elevated(&self) -> Result<bool>;
    fn list_clusters(&self) -> Result<Vec<ClusterHandle>>;
    fn list_nodes(&self, cluster: &ClusterHandle) -> Result<Vec<HostHandle>>;
    fn list_vms(&self, host: &HostHandle) -> Result<Vec<PropertyBag>>;
    fn host_config(&self, host: &HostHandle) -> Result<PropertyBag>;
    fn os_info(&self, host: &HostHandle) -> Result<PropertyBag>;
    fn system_info(&self, host: &HostHandle) -> Result<PropertyBag>;
    fn local_host(&self) -> HostHandle;
}

pub struct PowerShellBackend {
    executable: String,
}

impl PowerShellBackend {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn run(&self, script: &str) -> Result<String> {
        log::debug!("powershell: {}", script);
        let output = Command::new(&self.executable)
            .args(["-NoProfile", "-NonInteractive", "-Command", &utf8_script(script)])
            .output()
            .map_err(|e| ReportError::Query {
                command: script.to_string(),
                message: format!("failed to launch {}: {}", self.executable, e),
            })?;

        if !output.status.success() {
            return Err(ReportError::Query {
                command: script.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn query_all(&self, pipeline: &str) -> Result<Vec<PropertyBag>> {
        let script = format!(
            "{} | Select-Object * | ConvertTo-Json -Depth 1 -Compress",
            pipeline
        );
        parse_objects(&self.run(&script)?)
    }

    fn query_one(&self, pipeline: &str) -> Result<PropertyBag> {
        Ok(self
            .query_all(&format!("{} | Select-Object -First 1", pipeline))?
            .into_iter()
            .next()
            .unwrap_or_default())
    }
}

impl ManagementBackend for PowerShellBackend {
    fn is_elevated(&self) -> Result<bool> {
        let script = "([Security.Principal.WindowsPrincipal][Security.Principal.WindowsIdentity]::GetCurrent()).IsInRole([Security.Principal.WindowsBuiltInRole]::Administrator)";
        Ok(self.run(script)?.trim().eq_ignore_ascii_case("true"))
    }

    fn list_clusters(&self) -> Result<Vec<ClusterHandle>> {
        let bags = self
            .query_all("Get-Cluster -ErrorAction Stop")
            .map_err(|e| ReportError::ClusterUnavailable(e.to_string()))?;
        Ok(bags
            .into_iter()
            .map(|properties| ClusterHandle {
                name: name_of(&properties),
                properties,
            })
            .collect())
    }

    fn list_nodes(&self, cluster: &ClusterHandle) -> Result<Vec<HostHandle>> {
        let bags = self.query_all(&format!(
            "Get-ClusterNode -Cluster {} -ErrorAction Stop",
            ps_quote(&cluster.name)
        ))?;
        Ok(bags.iter().map(|b| HostHandle::new(name_of(b))).collect())
    }

    fn list_vms(&self, host: &HostHandle) -> Result<Vec<PropertyBag>> {
        self.query_all(&format!(
            "Get-VM -ComputerName {} -ErrorAction Stop",
            ps_quote(&host.name)
        ))
    }

    fn host_config(&self, host: &HostHandle) -> Result<PropertyBag> {
        self.query_one(&format!(
            "Get-VMHost -ComputerName {} -ErrorAction Stop",
            ps_quote(&host.name)
        ))
    }

    fn os_info(&self, host: &HostHandle) -> Result<PropertyBag> {
        self.query_one(&format!(
            "Get-CimInstance -ClassName Win32_OperatingSystem -ComputerName {} -ErrorAction Stop",
            ps_quote(&host.name)
        ))
    }

    fn system_info(&self, host: &HostHandle) -> Result<PropertyBag> {
        self.query_one(&format!(
            "Get-CimInstance -ClassName Win32_ComputerSystem -ComputerName {} -ErrorAction Stop",
            ps_quote(&host.name)
        ))
    }

    fn local_host(&self) -> HostHandle {
        let name = System::host_name()
            .or_else(|| std::env::var("COMPUTERNAME").ok())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "localhost".to_string());
        HostHandle::new(name)
    }
}

/// Windows PowerShell writes redirected output in the OEM code page unless
/// told otherwise, which mangles non-ASCII names.
fn utf8_script(script: &str) -> String {
    format!("[Console]::OutputEncoding=[Text.Encoding]::UTF8; {}", script)
}

/// Single-quoted PowerShell literal; embedded quotes are doubled.
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn name_of(bag: &PropertyBag) -> String {
    match bag.get("Name") {
        Some(PropertyValue::Text(name)) => name.clone(),
        Some(PropertyValue::Null) | None => "Unknown".to_string(),
        Some(other) => other.to_string(),
    }
}
