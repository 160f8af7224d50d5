use std::path::PathBuf;

use crate::cli::ReportArgs;
use crate::config::{Overrides, ReportConfig};
use crate::error::ReportError;
use crate::export::{write_report, ExportFormat};
use crate::inventory::types::Inventory;
use crate::inventory::{collect_full_inventory, discover, ensure_elevated, ManagementBackend, PowerShellBackend};
use crate::output::{print_info, print_success, print_warning, print_written};

pub fn handle_report_command(args: &ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ReportConfig::load(
        args.config.as_deref(),
        Overrides {
            output_dir: args.output_dir.clone(),
            format: args.format.clone(),
            strict: args.strict,
        },
    )?;

    let backend = PowerShellBackend::new(config.powershell.clone());
    let written = run_report(&backend, &config)?;
    print_written(&written);
    Ok(())
}

/// Privilege check, discovery, collection and export, in that order.
/// The format is validated first so a bad value never costs a collection.
pub fn run_report(backend: &dyn ManagementBackend, config: &ReportConfig) -> Result<Vec<PathBuf>, ReportError> {
    let format: ExportFormat = config.format.parse()?;
    ensure_elevated(backend)?;

    let topology = discover(backend);
    print_info(&format!(
        "Discovery mode: {:?} ({} cluster(s))",
        topology.mode,
        topology.clusters.len()
    ));

    let inventory = collect_full_inventory(backend, &topology, config.strict)?;
    report_skipped(&inventory);

    let written = write_report(&inventory, format, &config.output_dir)?;
    print_success(&format!(
        "Exported {:?} inventory: {} cluster(s), {} host(s), {} VM(s)",
        inventory.mode,
        inventory.clusters.len(),
        inventory.hosts.len(),
        inventory.vms.len()
    ));
    Ok(written)
}

fn report_skipped(inventory: &Inventory) {
    if inventory.skipped.is_empty() {
        return;
    }
    print_warning(&format!("{} host(s) were skipped:", inventory.skipped.len()));
    for skipped in &inventory.skipped {
        print_warning(&format!("  {}: {}", skipped.host, skipped.reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::backend::fake::FakeBackend;
    use std::fs;

    fn config_for(dir: &std::path::Path, format: &str) -> ReportConfig {
        ReportConfig {
            output_dir: dir.to_path_buf(),
            format: format.to_string(),
            ..ReportConfig::default()
        }
    }

    #[test]
    fn test_local_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::local("HV01", &["vm1", "vm2"]);
        let written = run_report(&backend, &config_for(dir.path(), "json")).unwrap();

        assert_eq!(written.len(), 1);
        let doc: serde_json::Value = serde_json::from_slice(&fs::read(&written[0]).unwrap()).unwrap();
        assert!(doc["Clusters"].as_array().unwrap().is_empty());
        assert_eq!(doc["Hosts"].as_array().unwrap().len(), 1);
        for vm in doc["VMs"].as_array().unwrap() {
            assert_eq!(vm["ClusterName"], "Local Node");
            assert_eq!(vm["Host"], "HV01");
        }
    }

    #[test]
    fn test_unrecognized_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::local("HV01", &["vm1"]);
        let result = run_report(&backend, &config_for(dir.path(), "xml"));

        assert!(matches!(result, Err(ReportError::UnsupportedFormat(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_not_elevated_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FakeBackend::local("HV01", &["vm1"]);
        backend.elevated = false;
        let result = run_report(&backend, &config_for(dir.path(), "csv"));

        assert!(matches!(result, Err(ReportError::NotElevated)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_clustered_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::clustered(
            &[("CLU-A", &["N1", "N2"]), ("CLU-B", &["N3"])],
            &[("N1", &["a1", "a2"]), ("N2", &["a3"]), ("N3", &["b1", "b2"])],
        );
        let written = run_report(&backend, &config_for(dir.path(), "csv")).unwrap();

        assert_eq!(written.len(), 3);
        let vm_rows = fs::read_to_string(&written[2]).unwrap().lines().count() - 1;
        assert_eq!(vm_rows, 5);
    }
}
