use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("This tool must be run from an elevated (Administrator) session")]
    NotElevated,

    #[error("Cluster service unavailable: {0}")]
    ClusterUnavailable(String),

    #[error("Query `{command}` failed: {message}")]
    Query { command: String, message: String },

    #[error("Failed to parse management output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid format '{0}'. Use 'json' or 'csv'.")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Host '{host}' failed: {source}")]
    HostFailed {
        host: String,
        #[source]
        source: Box<ReportError>,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
