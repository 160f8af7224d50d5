pub mod report;
pub mod topology;

pub use report::handle_report_command;
pub use topology::handle_topology_command;
