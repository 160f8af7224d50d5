use crate::error::{ReportError, Result};
use crate::inventory::backend::ManagementBackend;

/// Gate for every run: nothing is collected without an elevated principal.
/// A failed elevation query is treated the same as a negative answer.
pub fn ensure_elevated(backend: &dyn ManagementBackend) -> Result<()> {
    match backend.is_elevated() {
        Ok(true) => Ok(()),
        Ok(false) => Err(ReportError::NotElevated),
        Err(e) => {
            log::debug!("elevation query failed: {}", e);
            Err(ReportError::NotElevated)
        }
    }
}
