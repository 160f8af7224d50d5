use serde::Serialize;
use std::path::PathBuf;

use crate::error::ReportError;

pub fn output_data<T: Serialize>(data: &T, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        "yaml" => {
            print!("{}", serde_yaml::to_string(data)?);
        }
        other => return Err(ReportError::UnsupportedFormat(other.to_string()).into()),
    }
    Ok(())
}

/// Written paths go to stdout alone so scripts can capture them.
pub fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", path.display());
    }
}

pub fn print_success(message: &str) {
    eprintln!("✅ {}", message);
}

pub fn print_error(message: &str) {
    eprintln!("\x1b[31m❌ Error: {}\x1b[0m", message);
}

pub fn print_warning(message: &str) {
    eprintln!("\x1b[33m⚠️  Warning: {}\x1b[0m", message);
}

pub fn print_info(message: &str) {
    eprintln!("ℹ️  {}", message);
}
