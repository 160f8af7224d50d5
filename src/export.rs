//! Report writers.
//!
//! JSON reports are a single compact document with `Clusters`, `Hosts` and
//! `VMs` arrays. CSV reports are three files, one per entity, whose header
//! is the union of keys of that entity's records.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::{ReportError, Result};
use crate::inventory::types::{Inventory, PropertyBag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(rename = "Clusters")]
    clusters: &'a [PropertyBag],
    #[serde(rename = "Hosts")]
    hosts: &'a [PropertyBag],
    #[serde(rename = "VMs")]
    vms: &'a [PropertyBag],
}

/// `HyperV_Report_<yyyyMMdd_HHmmss>`
pub fn report_stem(started_at: &DateTime<Local>) -> String {
    format!("HyperV_Report_{}", started_at.format("%Y%m%d_%H%M%S"))
}

/// Write the report and return every file produced, in write order.
pub fn write_report(inventory: &Inventory, format: ExportFormat, dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("output directory '{}' does not exist", dir.display()),
        )));
    }

    let stem = report_stem(&inventory.started_at);
    match format {
        ExportFormat::Json => {
            let path = dir.join(format!("{}.json", stem));
            export_json(inventory, &path)?;
            Ok(vec![path])
        }
        ExportFormat::Csv => {
            let mut written = Vec::new();
            for (entity, records) in [
                ("Clusters", &inventory.clusters),
                ("Hosts", &inventory.hosts),
                ("VMs", &inventory.vms),
            ] {
                let path = dir.join(format!("{}-{}.csv", stem, entity));
                export_csv(records, &path)?;
                written.push(path);
            }
            Ok(written)
        }
    }
}

/// serde_json never emits a byte-order mark, which some consumers reject.
pub fn export_json(inventory: &Inventory, path: &Path) -> Result<()> {
    let report = JsonReport {
        clusters: &inventory.clusters,
        hosts: &inventory.hosts,
        vms: &inventory.vms,
    };
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &report)?;
    writer.flush()?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

pub fn export_csv(records: &[PropertyBag], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    if !records.is_empty() {
        let columns: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.keys().map(String::as_str))
            .collect();

        write_row(&mut writer, columns.iter().map(|c| c.to_string()))?;
        for record in records {
            write_row(
                &mut writer,
                columns
                    .iter()
                    .map(|c| record.get(*c).map(|v| v.to_string()).unwrap_or_default()),
            )?;
        }
    }

    writer.flush()?;
    log::debug!("wrote {} ({} rows)", path.display(), records.len());
    Ok(())
}

fn write_row<W: Write>(writer: &mut W, cells: impl Iterator<Item = String>) -> Result<()> {
    let line = cells.map(|c| escape_csv(&c)).collect::<Vec<_>>().join(",");
    writeln!(writer, "{}", line)?;
    Ok(())
}

fn escape_csv(cell: &str) -> String {
    if cell.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
