use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel written into `ClusterName` when no cluster owns the host.
pub const LOCAL_NODE: &str = "Local Node";

/// A single reflected property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
    #[serde(serialize_with = "serialize_timestamp")]
    Timestamp(DateTime<Utc>),
}

/// Shared by JSON and CSV so a timestamp reads the same in both reports.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Unsigned(u) => write!(f, "{}", u),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Timestamp(ts) => f.write_str(&format_timestamp(ts)),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

/// Flat key/value snapshot of one management object. Keys are kept sorted
/// so two runs over the same environment serialize identically.
pub type PropertyBag = BTreeMap<String, PropertyValue>;

pub type ClusterRecord = PropertyBag;
pub type HostRecord = PropertyBag;
pub type VmRecord = PropertyBag;

#[derive(Debug, Clone)]
pub struct ClusterHandle {
    pub name: String,
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostHandle {
    pub name: String,
}

impl HostHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiscoveryMode {
    Local,
    Clustered,
}

#[derive(Debug)]
pub struct ClusterScope {
    pub cluster: ClusterHandle,
    pub nodes: Vec<HostHandle>,
    /// Set when the node listing failed; `nodes` is then empty.
    pub node_error: Option<String>,
}

/// Result of topology discovery: which hosts to visit and who owns them.
#[derive(Debug)]
pub struct Topology {
    pub mode: DiscoveryMode,
    pub clusters: Vec<ClusterScope>,
    pub local: Option<HostHandle>,
}

#[derive(Debug, Serialize)]
pub struct TopologySummary {
    pub mode: DiscoveryMode,
    pub clusters: Vec<ClusterSummary>,
    pub local_host: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClusterSummary {
    pub name: String,
    pub nodes: Vec<String>,
}

impl From<&Topology> for TopologySummary {
    fn from(topology: &Topology) -> Self {
        TopologySummary {
            mode: topology.mode,
            clusters: topology
                .clusters
                .iter()
                .map(|scope| ClusterSummary {
                    name: scope.cluster.name.clone(),
                    nodes: scope.nodes.iter().map(|n| n.name.clone()).collect(),
                })
                .collect(),
            local_host: topology.local.as_ref().map(|h| h.name.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedHost {
    pub host: String,
    pub reason: String,
}

/// Everything gathered in one run, handed wholesale to the exporter.
#[derive(Debug)]
pub struct Inventory {
    pub started_at: DateTime<Local>,
    pub mode: DiscoveryMode,
    pub clusters: Vec<ClusterRecord>,
    pub hosts: Vec<HostRecord>,
    pub vms: Vec<VmRecord>,
    pub skipped: Vec<SkippedHost>,
}
