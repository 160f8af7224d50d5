// Hyper-V inventory collection modules
pub mod types;
pub mod reflect;
pub mod backend;
pub mod privilege;
pub mod topology;
pub mod collect_host;
pub mod collect_vms;
pub mod collector;

// Re-export main collection functions
pub use backend::{ManagementBackend, PowerShellBackend};
pub use privilege::ensure_elevated;
pub use topology::discover;
pub use collector::collect_full_inventory;
