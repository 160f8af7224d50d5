use std::path::PathBuf;

use crate::config::{Overrides, ReportConfig};
use crate::inventory::types::TopologySummary;
use crate::inventory::{discover, ensure_elevated, PowerShellBackend};
use crate::output::output_data;

pub fn handle_topology_command(format: &str, config: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ReportConfig::load(config.map(PathBuf::as_path), Overrides::default())?;
    let backend = PowerShellBackend::new(config.powershell);

    ensure_elevated(&backend)?;
    let topology = discover(&backend);
    output_data(&TopologySummary::from(&topology), format)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::inventory::backend::fake::FakeBackend;
    use crate::inventory::discover;
    use crate::inventory::types::TopologySummary;

    #[test]
    fn test_summary_serializes() {
        let backend = FakeBackend::clustered(&[("CLU-A", &["N1", "N2"])], &[]);
        let summary = TopologySummary::from(&discover(&backend));
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["mode"], "CLUSTERED");
        assert_eq!(value["clusters"][0]["name"], "CLU-A");
        assert_eq!(value["clusters"][0]["nodes"][1], "N2");
        assert!(value["local_host"].is_null());
    }

    #[test]
    fn test_local_summary() {
        let backend = FakeBackend::local("HV01", &[]);
        let summary = TopologySummary::from(&discover(&backend));
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["mode"], "LOCAL");
        assert_eq!(value["local_host"], "HV01");
    }
}
